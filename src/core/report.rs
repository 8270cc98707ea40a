//! Text output for the CLI: the model input table, the option listing and the
//! recommendation itself.

use crate::core::artifact::ModelArtifact;
use crate::domain::model::{FeatureVector, Recommendation};
use crate::utils::error::{HydrationError, Result};
use std::io::Write;

/// Writes the row as fed to the model: a header of column names then one
/// record, columns in `app_numeric` then `app_categ` order.
pub fn write_feature_table<W: Write>(
    artifact: &ModelArtifact,
    features: &FeatureVector,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let columns: Vec<&str> = artifact.feature_columns().collect();
    let mut values = Vec::with_capacity(columns.len());
    for column in &columns {
        let value = features.display_value(column).ok_or_else(|| {
            HydrationError::artifact(format!("feature list names unknown column '{}'", column))
        })?;
        values.push(value);
    }

    csv_writer.write_record(&columns)?;
    csv_writer.write_record(&values)?;
    csv_writer.flush()?;
    Ok(())
}

pub fn render_options(artifact: &ModelArtifact) -> String {
    let mut out = String::new();
    out.push_str(&format!("Gender: {}\n", artifact.gender_options().join(", ")));
    out.push_str("Exercise_Type:\n");
    for exercise_type in artifact.exercise_types() {
        let marker = if artifact.is_distance_sensitive(exercise_type) {
            " (distance)"
        } else {
            ""
        };
        out.push_str(&format!("  {}{}\n", exercise_type, marker));
    }
    out
}

pub fn render_recommendation(recommendation: &Recommendation) -> String {
    let mut lines = vec![recommendation.headline()];
    lines.extend(recommendation.notes().iter().map(|n| n.to_string()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::{default_app_categ, default_app_numeric, Vocabulary};
    use crate::domain::model::Prediction;
    use crate::domain::ports::Predictor;
    use std::sync::Arc;

    struct Constant;

    impl Predictor for Constant {
        fn predict(&self, _row: &FeatureVector) -> Result<f64> {
            Ok(1.0)
        }
    }

    fn artifact(app_numeric: Vec<String>) -> ModelArtifact {
        ModelArtifact::new(
            Arc::new(Constant),
            app_numeric,
            default_app_categ(),
            Vocabulary::from_fitted(
                &default_app_categ(),
                vec![
                    vec!["FEMALE".to_string(), "MALE".to_string()],
                    vec!["WALKING".to_string(), "STRENGTH".to_string()],
                ],
            ),
            None,
        )
    }

    fn features() -> FeatureVector {
        FeatureVector {
            age: 27,
            exercise_duration_seconds: 3600,
            temperature_c: 18.0,
            weight_kg: 60.0,
            height_cm: 165.0,
            distance_m: 8000.0,
            bmi: 22.5,
            pace_mps: 2.5,
            long_distance_flag: 0,
            effort_score: 1.0,
            gender: "FEMALE".to_string(),
            exercise_type: "WALKING".to_string(),
        }
    }

    #[test]
    fn test_feature_table_layout() {
        let mut out = Vec::new();
        write_feature_table(&artifact(default_app_numeric()), &features(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Age,Exercise_Duration_Seconds,Temperature_C,Weight_kg,Height_cm,Distance_m,BMI,Pace_mps,LongDistanceFlag,Effort_Score,Gender,Exercise_Type"
        );
        assert_eq!(lines[1], "27,3600,18,60,165,8000,22.5,2.5,0,1,FEMALE,WALKING");
    }

    #[test]
    fn test_feature_table_rejects_unknown_columns() {
        let mut out = Vec::new();
        let result = write_feature_table(
            &artifact(vec!["Age".to_string(), "Heart_Rate".to_string()]),
            &features(),
            &mut out,
        );
        assert!(matches!(result, Err(HydrationError::ArtifactError { .. })));
    }

    #[test]
    fn test_options_mark_distance_types() {
        let text = render_options(&artifact(default_app_numeric()));
        assert!(text.starts_with("Gender: FEMALE, MALE\n"));
        assert!(text.contains("  STRENGTH\n"));
        assert!(text.contains("  WALKING (distance)\n"));
    }

    #[test]
    fn test_render_recommendation() {
        let mut long_run = features();
        long_run.long_distance_flag = 1;
        let recommendation = Recommendation {
            liters: Prediction::from_raw(2.0).unwrap(),
            raw_liters: 2.0,
            long_distance: true,
            features: long_run,
        };
        let text = render_recommendation(&recommendation);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Recommended intake: 2.00 L for this session.");
        assert_eq!(lines[1], Recommendation::LONG_DISTANCE_NOTE);
        assert_eq!(lines[2], Recommendation::DISCLAIMER);
    }
}
