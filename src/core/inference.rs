use crate::core::artifact::ModelArtifact;
use crate::core::features::derive;
use crate::domain::model::{FeatureVector, Prediction, Recommendation, SessionInput};
use crate::utils::error::{HydrationError, Result};

/// Runs one record through the model and clamps the output into the
/// plausible intake range. Returns the clamped and the raw value.
pub fn infer(artifact: &ModelArtifact, features: &FeatureVector) -> Result<(Prediction, f64)> {
    let raw = artifact.predictor().predict(features)?;
    let prediction = Prediction::from_raw(raw)
        .ok_or_else(|| HydrationError::prediction("model returned NaN"))?;

    tracing::debug!(raw, clamped = prediction.liters(), "Model estimate");
    if prediction.liters() != raw {
        tracing::warn!(
            "Raw estimate {:.3} L outside [{}, {}], clamped to {:.2} L",
            raw,
            Prediction::MIN_LITERS,
            Prediction::MAX_LITERS,
            prediction.liters()
        );
    }

    Ok((prediction, raw))
}

/// Derive → infer → report for one session.
pub struct HydrationEstimator<'a> {
    artifact: &'a ModelArtifact,
}

impl<'a> HydrationEstimator<'a> {
    pub fn new(artifact: &'a ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn features(&self, input: &SessionInput) -> FeatureVector {
        derive(input, self.artifact.distance_sensitive_types())
    }

    pub fn estimate(&self, input: &SessionInput) -> Result<Recommendation> {
        let features = self.features(input);
        let (liters, raw_liters) = infer(self.artifact, &features)?;

        Ok(Recommendation {
            liters,
            raw_liters,
            long_distance: features.is_long_distance(),
            features,
        })
    }
}
