//! Loading the model artifact bundle and exposing its vocabularies.
//!
//! Categorical options are read out of the fitted one-hot encoder rather than
//! maintained by hand, so the form can only offer values the model was
//! trained on.

use crate::core::pipeline::FittedPipeline;
use crate::domain::ports::{ArtifactStore, Predictor};
use crate::utils::error::{HydrationError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

pub const DEFAULT_ARTIFACT_PATH: &str = "hydration_pipeline.json";

/// Tokens that mark an exercise type as distance-sensitive when the bundle
/// carries no explicit list.
pub const DISTANCE_TOKENS: [&str; 3] = ["RUN", "WALK", "TREADMILL"];

pub const DEFAULT_GENDER_OPTIONS: [&str; 2] = ["MALE", "FEMALE"];

pub fn default_app_numeric() -> Vec<String> {
    [
        "Age",
        "Exercise_Duration_Seconds",
        "Temperature_C",
        "Weight_kg",
        "Height_cm",
        "Distance_m",
        "BMI",
        "Pace_mps",
        "LongDistanceFlag",
        "Effort_Score",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_app_categ() -> Vec<String> {
    vec!["Gender".to_string(), "Exercise_Type".to_string()]
}

/// On-disk shape of the bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactBundle {
    pub pipeline: FittedPipeline,
    #[serde(default)]
    pub app_numeric: Option<Vec<String>>,
    #[serde(default)]
    pub app_categ: Option<Vec<String>>,
    #[serde(default)]
    pub exercise_types_distance_sensitive: Option<Vec<String>>,
}

/// Fitted categories per categorical field, uppercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    fields: BTreeMap<String, Vec<String>>,
}

impl Vocabulary {
    /// Pairs each categorical field name with the encoder's category list, in
    /// order. Extra names or lists without a partner are dropped.
    pub fn from_fitted(app_categ: &[String], categories: Vec<Vec<String>>) -> Self {
        let fields = app_categ
            .iter()
            .cloned()
            .zip(categories)
            .collect::<BTreeMap<_, _>>();
        Self { fields }
    }

    /// Valid values of `field` in fitted order.
    pub fn categories(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn gender_options(&self) -> Vec<String> {
        self.categories("Gender")
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| DEFAULT_GENDER_OPTIONS.iter().map(|s| s.to_string()).collect())
    }

    /// Sorted exercise types; empty when the encoder has no such field.
    pub fn exercise_types(&self) -> Vec<String> {
        let mut types = self
            .categories("Exercise_Type")
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        types.sort();
        types
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceSource {
    Explicit,
    Heuristic,
}

/// Explicit list when it has entries, else the token heuristic over `exercise_types`.
pub fn distance_sensitive_types(
    explicit: Option<&[String]>,
    exercise_types: &[String],
) -> (BTreeSet<String>, DistanceSource) {
    let explicit: BTreeSet<String> = explicit.unwrap_or_default().iter().cloned().collect();
    if !explicit.is_empty() {
        return (explicit, DistanceSource::Explicit);
    }

    let inferred = exercise_types
        .iter()
        .filter(|t| DISTANCE_TOKENS.iter().any(|token| t.contains(token)))
        .cloned()
        .collect();
    (inferred, DistanceSource::Heuristic)
}

/// The loaded model plus everything derived from it at load time. Immutable.
#[derive(Clone)]
pub struct ModelArtifact {
    predictor: Arc<dyn Predictor>,
    app_numeric: Vec<String>,
    app_categ: Vec<String>,
    vocabulary: Vocabulary,
    exercise_types: Vec<String>,
    gender_options: Vec<String>,
    distance_sensitive: BTreeSet<String>,
    distance_source: DistanceSource,
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("app_numeric", &self.app_numeric)
            .field("app_categ", &self.app_categ)
            .field("vocabulary", &self.vocabulary)
            .field("distance_sensitive", &self.distance_sensitive)
            .field("distance_source", &self.distance_source)
            .finish_non_exhaustive()
    }
}

impl ModelArtifact {
    /// Builds an artifact around any predictor. Vocabulary and distance
    /// sensitivity are derived the same way as for a loaded bundle.
    pub fn new(
        predictor: Arc<dyn Predictor>,
        app_numeric: Vec<String>,
        app_categ: Vec<String>,
        vocabulary: Vocabulary,
        explicit_distance_types: Option<&[String]>,
    ) -> Self {
        let exercise_types = vocabulary.exercise_types();
        let gender_options = vocabulary.gender_options();
        let (distance_sensitive, distance_source) =
            distance_sensitive_types(explicit_distance_types, &exercise_types);

        Self {
            predictor,
            app_numeric,
            app_categ,
            vocabulary,
            exercise_types,
            gender_options,
            distance_sensitive,
            distance_source,
        }
    }

    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self> {
        bundle.pipeline.validate_structure()?;

        let app_numeric = bundle.app_numeric.unwrap_or_else(default_app_numeric);
        let app_categ = bundle.app_categ.unwrap_or_else(default_app_categ);
        let vocabulary =
            Vocabulary::from_fitted(&app_categ, bundle.pipeline.prep.cat.ohe.category_labels());

        Ok(Self::new(
            Arc::new(bundle.pipeline),
            app_numeric,
            app_categ,
            vocabulary,
            bundle.exercise_types_distance_sensitive.as_deref(),
        ))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bundle: ArtifactBundle = serde_json::from_slice(bytes)?;
        Self::from_bundle(bundle)
    }

    pub fn load_from<S: ArtifactStore>(store: &S, path: &str) -> Result<Self> {
        tracing::info!("Loading model artifact from {}", path);
        let bytes = store.read_file(path)?;
        let artifact = Self::from_slice(&bytes)?;

        tracing::info!(
            exercise_types = artifact.exercise_types.len(),
            gender_options = artifact.gender_options.len(),
            distance_sensitive = artifact.distance_sensitive.len(),
            "Model artifact ready"
        );
        if artifact.distance_source == DistanceSource::Heuristic {
            tracing::debug!(
                "No explicit distance-sensitive list in bundle, inferred {:?}",
                artifact.distance_sensitive
            );
        }
        if artifact.exercise_types.is_empty() {
            tracing::warn!("Fitted encoder has no Exercise_Type categories");
        }

        Ok(artifact)
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn app_numeric(&self) -> &[String] {
        &self.app_numeric
    }

    pub fn app_categ(&self) -> &[String] {
        &self.app_categ
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn exercise_types(&self) -> &[String] {
        &self.exercise_types
    }

    pub fn gender_options(&self) -> &[String] {
        &self.gender_options
    }

    pub fn distance_sensitive_types(&self) -> &BTreeSet<String> {
        &self.distance_sensitive
    }

    pub fn distance_source(&self) -> DistanceSource {
        self.distance_source
    }

    pub fn is_distance_sensitive(&self, exercise_type: &str) -> bool {
        self.distance_sensitive.contains(exercise_type)
    }

    /// Columns of the model input row in display order.
    pub fn feature_columns(&self) -> impl Iterator<Item = &str> {
        self.app_numeric
            .iter()
            .chain(self.app_categ.iter())
            .map(String::as_str)
    }
}

/// Write-once holder for the artifact. The first successful `get_or_load`
/// reads the bundle; every later call hands back the same `Arc`.
pub struct ArtifactCache<S: ArtifactStore> {
    store: S,
    path: String,
    cell: OnceLock<Arc<ModelArtifact>>,
}

impl<S: ArtifactStore> ArtifactCache<S> {
    pub fn new(store: S, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get_or_load(&self) -> Result<Arc<ModelArtifact>> {
        if let Some(artifact) = self.cell.get() {
            return Ok(Arc::clone(artifact));
        }

        let loaded = Arc::new(ModelArtifact::load_from(&self.store, &self.path)?);
        // A concurrent first load may have won; keep whichever landed first
        let artifact = self.cell.get_or_init(|| loaded);
        Ok(Arc::clone(artifact))
    }
}

/// Reads `path` as a bundle, mapping a missing file to an artifact error.
pub fn read_bundle_bytes(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            HydrationError::artifact(format!("artifact file '{}' not found", path.display()))
        }
        _ => HydrationError::IoError(e),
    })
}
