use serde::{Deserialize, Serialize};

/// Raw attributes of one exercise session, as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    pub age: i64,
    pub gender: String,
    pub exercise_type: String,
    pub duration_minutes: f64,
    pub temperature_c: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Only meaningful for distance-sensitive exercise types.
    pub distance_km: f64,
}

/// The exact record the pipeline was trained on. Field names serialize to the
/// training column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Exercise_Duration_Seconds")]
    pub exercise_duration_seconds: i64,
    #[serde(rename = "Temperature_C")]
    pub temperature_c: f64,
    #[serde(rename = "Weight_kg")]
    pub weight_kg: f64,
    #[serde(rename = "Height_cm")]
    pub height_cm: f64,
    #[serde(rename = "Distance_m")]
    pub distance_m: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "Pace_mps")]
    pub pace_mps: f64,
    #[serde(rename = "LongDistanceFlag")]
    pub long_distance_flag: i64,
    #[serde(rename = "Effort_Score")]
    pub effort_score: f64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Exercise_Type")]
    pub exercise_type: String,
}

/// A single column value looked up by training column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Number(f64),
    Category(&'a str),
}

impl FeatureVector {
    pub const NUMERIC_COLUMNS: [&'static str; 10] = [
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
    ];

    pub const CATEGORICAL_COLUMNS: [&'static str; 2] = ["Gender", "Exercise_Type"];

    pub fn value(&self, column: &str) -> Option<FeatureValue<'_>> {
        let value = match column {
            "Age" => FeatureValue::Number(self.age as f64),
            "Exercise_Duration_Seconds" => {
                FeatureValue::Number(self.exercise_duration_seconds as f64)
            }
            "Temperature_C" => FeatureValue::Number(self.temperature_c),
            "Weight_kg" => FeatureValue::Number(self.weight_kg),
            "Height_cm" => FeatureValue::Number(self.height_cm),
            "Distance_m" => FeatureValue::Number(self.distance_m),
            "BMI" => FeatureValue::Number(self.bmi),
            "Pace_mps" => FeatureValue::Number(self.pace_mps),
            "LongDistanceFlag" => FeatureValue::Number(self.long_distance_flag as f64),
            "Effort_Score" => FeatureValue::Number(self.effort_score),
            "Gender" => FeatureValue::Category(&self.gender),
            "Exercise_Type" => FeatureValue::Category(&self.exercise_type),
            _ => return None,
        };
        Some(value)
    }

    pub fn is_known_column(column: &str) -> bool {
        Self::NUMERIC_COLUMNS.contains(&column) || Self::CATEGORICAL_COLUMNS.contains(&column)
    }

    pub fn is_long_distance(&self) -> bool {
        self.long_distance_flag == 1
    }

    /// Renders a column as it appears in the inputs table.
    pub fn display_value(&self, column: &str) -> Option<String> {
        match (column, self.value(column)?) {
            ("Age" | "Exercise_Duration_Seconds" | "LongDistanceFlag", FeatureValue::Number(n)) => {
                Some(format!("{}", n as i64))
            }
            (_, FeatureValue::Number(n)) => Some(format!("{}", n)),
            (_, FeatureValue::Category(c)) => Some(c.to_string()),
        }
    }
}

/// Recommended intake in liters, always inside `[MIN_LITERS, MAX_LITERS]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Prediction(f64);

impl Prediction {
    pub const MIN_LITERS: f64 = 0.2;
    pub const MAX_LITERS: f64 = 4.0;

    /// Clamps a raw model output. NaN has no sensible place in the range and
    /// yields `None`.
    pub fn from_raw(raw: f64) -> Option<Self> {
        if raw.is_nan() {
            return None;
        }
        Some(Self(raw.clamp(Self::MIN_LITERS, Self::MAX_LITERS)))
    }

    pub fn liters(self) -> f64 {
        self.0
    }
}

/// Everything reported back to the user after one estimate.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub liters: Prediction,
    pub raw_liters: f64,
    pub long_distance: bool,
    pub features: FeatureVector,
}

impl Recommendation {
    pub const LONG_DISTANCE_NOTE: &'static str =
        "Long-distance session detected (>=10 km); effort adjusted accordingly.";
    pub const DISCLAIMER: &'static str =
        "Model estimate; adjust with your experience and any medical advice.";

    pub fn headline(&self) -> String {
        format!(
            "Recommended intake: {:.2} L for this session.",
            self.liters.liters()
        )
    }

    pub fn notes(&self) -> Vec<&'static str> {
        let mut notes = Vec::with_capacity(2);
        if self.long_distance {
            notes.push(Self::LONG_DISTANCE_NOTE);
        }
        notes.push(Self::DISCLAIMER);
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_features() -> FeatureVector {
        FeatureVector {
            age: 27,
            exercise_duration_seconds: 3600,
            temperature_c: 18.0,
            weight_kg: 60.0,
            height_cm: 165.0,
            distance_m: 8000.0,
            bmi: 22.03856749311295,
            pace_mps: 2.2222222222222223,
            long_distance_flag: 0,
            effort_score: 1.0,
            gender: "FEMALE".to_string(),
            exercise_type: "RUN".to_string(),
        }
    }

    #[test]
    fn test_prediction_clamps_out_of_range_values() {
        assert_eq!(Prediction::from_raw(10.0).unwrap().liters(), 4.0);
        assert_eq!(Prediction::from_raw(-1.0).unwrap().liters(), 0.2);
        assert_eq!(Prediction::from_raw(f64::INFINITY).unwrap().liters(), 4.0);
        assert_eq!(Prediction::from_raw(1.37).unwrap().liters(), 1.37);
        assert!(Prediction::from_raw(f64::NAN).is_none());
    }

    #[test]
    fn test_feature_vector_serializes_training_column_names() {
        let json = serde_json::to_value(sample_features()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 12);
        for column in FeatureVector::NUMERIC_COLUMNS
            .iter()
            .chain(FeatureVector::CATEGORICAL_COLUMNS.iter())
        {
            assert!(object.contains_key(*column), "missing column {}", column);
        }
        assert_eq!(object["Exercise_Duration_Seconds"], 3600);
    }

    #[test]
    fn test_value_lookup_by_column() {
        let features = sample_features();
        assert_eq!(features.value("Distance_m"), Some(FeatureValue::Number(8000.0)));
        assert_eq!(features.value("Gender"), Some(FeatureValue::Category("FEMALE")));
        assert_eq!(features.value("Heart_Rate"), None);
        assert_eq!(features.display_value("LongDistanceFlag").unwrap(), "0");
    }

    #[test]
    fn test_recommendation_notes() {
        let mut recommendation = Recommendation {
            liters: Prediction::from_raw(1.234).unwrap(),
            raw_liters: 1.234,
            long_distance: false,
            features: sample_features(),
        };
        assert_eq!(
            recommendation.headline(),
            "Recommended intake: 1.23 L for this session."
        );
        assert_eq!(recommendation.notes(), vec![Recommendation::DISCLAIMER]);

        recommendation.long_distance = true;
        assert_eq!(recommendation.notes()[0], Recommendation::LONG_DISTANCE_NOTE);
    }
}
