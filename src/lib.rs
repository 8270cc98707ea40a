pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{HydrationConfig, LocalArtifactStore};
pub use crate::core::{
    artifact::{ArtifactCache, ModelArtifact},
    features::derive,
    form::{SessionDraft, SessionForm},
    inference::{infer, HydrationEstimator},
};
pub use crate::domain::model::{FeatureVector, Prediction, Recommendation, SessionInput};
pub use crate::domain::ports::{ArtifactStore, Predictor};
pub use crate::utils::error::{HydrationError, Result};
