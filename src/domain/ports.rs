use crate::domain::model::FeatureVector;
use crate::utils::error::Result;

/// A fitted regression capability: one feature record in, one raw estimate out.
pub trait Predictor: Send + Sync {
    fn predict(&self, row: &FeatureVector) -> Result<f64>;
}

/// Where artifact bundles are read from.
pub trait ArtifactStore: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
}
