use crate::core::artifact::read_bundle_bytes;
use crate::core::ArtifactStore;
use crate::utils::error::Result;
use std::path::Path;

/// Reads artifacts from the local filesystem, relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    base_path: String,
}

impl LocalArtifactStore {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Default for LocalArtifactStore {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        read_bundle_bytes(&full_path)
    }
}
