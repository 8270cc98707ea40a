pub mod artifact;
pub mod features;
pub mod form;
pub mod inference;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{FeatureVector, Prediction, Recommendation, SessionInput};
pub use crate::domain::ports::{ArtifactStore, Predictor};
pub use crate::utils::error::Result;
