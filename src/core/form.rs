//! The session form: slider bounds, defaults, and option lists taken from the
//! loaded artifact.

use crate::core::artifact::ModelArtifact;
use crate::domain::model::SessionInput;
use crate::utils::error::{HydrationError, Result};
use crate::utils::validation::{validate_one_of, validate_range};
use serde::{Deserialize, Serialize};

/// Inclusive bounds and default of one slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider<T> {
    pub label: &'static str,
    pub min: T,
    pub max: T,
    pub default: T,
    pub step: T,
}

impl<T: PartialOrd + std::fmt::Display + Copy> Slider<T> {
    pub fn check(&self, value: T) -> Result<T> {
        validate_range(self.label, value, self.min, self.max)?;
        Ok(value)
    }
}

pub const AGE: Slider<i64> = Slider {
    label: "Age",
    min: 12,
    max: 90,
    default: 27,
    step: 1,
};

pub const DURATION_MINUTES: Slider<f64> = Slider {
    label: "Exercise_Duration (minutes)",
    min: 5.0,
    max: 400.0,
    default: 60.0,
    step: 5.0,
};

pub const TEMPERATURE_C: Slider<f64> = Slider {
    label: "Temperature_C",
    min: -5.0,
    max: 50.0,
    default: 18.0,
    step: 0.5,
};

pub const WEIGHT_KG: Slider<f64> = Slider {
    label: "Weight_kg",
    min: 35.0,
    max: 160.0,
    default: 60.0,
    step: 0.5,
};

pub const HEIGHT_CM: Slider<f64> = Slider {
    label: "Height_cm",
    min: 120.0,
    max: 220.0,
    default: 165.0,
    step: 0.5,
};

pub const DISTANCE_KM: Slider<f64> = Slider {
    label: "Distance_km",
    min: 0.0,
    max: 60.0,
    default: 8.0,
    step: 0.5,
};

/// Partially filled form. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub exercise_type: Option<String>,
    pub duration_minutes: Option<f64>,
    pub temperature_c: Option<f64>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub distance_km: Option<f64>,
}

impl SessionDraft {
    /// Fields set in `self` win over those in `fallback`.
    pub fn or(self, fallback: &SessionDraft) -> SessionDraft {
        SessionDraft {
            age: self.age.or(fallback.age),
            gender: self.gender.or_else(|| fallback.gender.clone()),
            exercise_type: self.exercise_type.or_else(|| fallback.exercise_type.clone()),
            duration_minutes: self.duration_minutes.or(fallback.duration_minutes),
            temperature_c: self.temperature_c.or(fallback.temperature_c),
            weight_kg: self.weight_kg.or(fallback.weight_kg),
            height_cm: self.height_cm.or(fallback.height_cm),
            distance_km: self.distance_km.or(fallback.distance_km),
        }
    }

    /// Range checks for the numeric fields that are set.
    pub fn check_bounds(&self) -> Result<()> {
        if let Some(v) = self.age {
            AGE.check(v)?;
        }
        let checks = [
            (&DURATION_MINUTES, self.duration_minutes),
            (&TEMPERATURE_C, self.temperature_c),
            (&WEIGHT_KG, self.weight_kg),
            (&HEIGHT_CM, self.height_cm),
            (&DISTANCE_KM, self.distance_km),
        ];
        for (slider, value) in checks {
            if let Some(v) = value {
                slider.check(v)?;
            }
        }
        Ok(())
    }
}

/// Form options synchronized with the artifact's fitted vocabulary.
#[derive(Debug, Clone)]
pub struct SessionForm<'a> {
    artifact: &'a ModelArtifact,
}

impl<'a> SessionForm<'a> {
    pub fn new(artifact: &'a ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn gender_options(&self) -> &[String] {
        self.artifact.gender_options()
    }

    pub fn exercise_types(&self) -> &[String] {
        self.artifact.exercise_types()
    }

    /// Second gender option when there is one, else the first.
    pub fn default_gender(&self) -> Option<&str> {
        let options = self.gender_options();
        let index = 1usize.min(options.len().saturating_sub(1));
        options.get(index).map(String::as_str)
    }

    pub fn default_exercise_type(&self) -> Option<&str> {
        self.exercise_types().first().map(String::as_str)
    }

    /// Whether the distance slider is shown for `exercise_type`.
    pub fn shows_distance(&self, exercise_type: &str) -> bool {
        self.artifact.is_distance_sensitive(&exercise_type.to_uppercase())
    }

    /// Resolves a draft into a complete session. Categories must be in the
    /// fitted vocabulary; distance is zero unless the slider would be shown.
    pub fn submit(&self, draft: &SessionDraft) -> Result<SessionInput> {
        draft.check_bounds()?;

        let gender = match &draft.gender {
            Some(g) => validate_one_of("Gender", &g.to_uppercase(), self.gender_options())?,
            None => self.default_gender().ok_or_else(|| HydrationError::MissingConfigError {
                field: "Gender".to_string(),
            })?,
        };

        let exercise_type = match &draft.exercise_type {
            Some(t) => validate_one_of("Exercise_Type", &t.to_uppercase(), self.exercise_types())?,
            None => self
                .default_exercise_type()
                .ok_or_else(|| HydrationError::MissingConfigError {
                    field: "Exercise_Type".to_string(),
                })?,
        };

        let distance_km = if self.shows_distance(exercise_type) {
            draft.distance_km.unwrap_or(DISTANCE_KM.default)
        } else {
            if draft.distance_km.is_some() {
                tracing::debug!("{} is not distance-sensitive, ignoring distance", exercise_type);
            }
            0.0
        };

        Ok(SessionInput {
            age: draft.age.unwrap_or(AGE.default),
            gender: gender.to_string(),
            exercise_type: exercise_type.to_string(),
            duration_minutes: draft.duration_minutes.unwrap_or(DURATION_MINUTES.default),
            temperature_c: draft.temperature_c.unwrap_or(TEMPERATURE_C.default),
            weight_kg: draft.weight_kg.unwrap_or(WEIGHT_KG.default),
            height_cm: draft.height_cm.unwrap_or(HEIGHT_CM.default),
            distance_km,
        })
    }
}
