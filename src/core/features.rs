//! Feature derivation. Every formula here must match the one used when the
//! pipeline was trained, including integer truncation of the duration.

use crate::domain::model::{FeatureVector, SessionInput};
use std::collections::BTreeSet;

pub const LONG_DISTANCE_KM: f64 = 10.0;
pub const LONG_DISTANCE_EFFORT_BONUS: f64 = 0.25;

pub fn duration_seconds(duration_minutes: f64) -> i64 {
    (duration_minutes * 60.0).floor() as i64
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / height_m.powi(2)
}

/// Meters per second; zero when the session has no whole second of duration.
pub fn pace_mps(distance_m: f64, duration_seconds: i64) -> f64 {
    if duration_seconds > 0 {
        distance_m / duration_seconds as f64
    } else {
        0.0
    }
}

pub fn effort_score(duration_seconds: i64, long_distance_flag: i64) -> f64 {
    (duration_seconds as f64 / 3600.0)
        * (1.0 + LONG_DISTANCE_EFFORT_BONUS * long_distance_flag as f64)
}

/// Maps a session to the feature record the pipeline expects.
///
/// Distance only counts for exercise types in `distance_sensitive_types`; for
/// any other type the distance columns are zero whatever `distance_km` holds.
pub fn derive(input: &SessionInput, distance_sensitive_types: &BTreeSet<String>) -> FeatureVector {
    let gender = input.gender.to_uppercase();
    let exercise_type = input.exercise_type.to_uppercase();
    let distance_sensitive = distance_sensitive_types.contains(&exercise_type);

    let seconds = duration_seconds(input.duration_minutes);
    let distance_m = if distance_sensitive {
        input.distance_km * 1000.0
    } else {
        0.0
    };
    let long_distance_flag = i64::from(distance_sensitive && input.distance_km >= LONG_DISTANCE_KM);

    let features = FeatureVector {
        age: input.age,
        exercise_duration_seconds: seconds,
        temperature_c: input.temperature_c,
        weight_kg: input.weight_kg,
        height_cm: input.height_cm,
        distance_m,
        bmi: bmi(input.weight_kg, input.height_cm),
        pace_mps: pace_mps(distance_m, seconds),
        long_distance_flag,
        effort_score: effort_score(seconds, long_distance_flag),
        gender,
        exercise_type,
    };

    tracing::debug!(
        duration_seconds = features.exercise_duration_seconds,
        distance_m = features.distance_m,
        bmi = features.bmi,
        pace_mps = features.pace_mps,
        long_distance_flag = features.long_distance_flag,
        effort_score = features.effort_score,
        "Derived session features"
    );

    features
}
