use anyhow::Result;
use smart_hydration::core::artifact::{default_app_categ, default_app_numeric, Vocabulary};
use smart_hydration::core::report::write_feature_table;
use smart_hydration::{
    ArtifactCache, FeatureVector, HydrationEstimator, LocalArtifactStore, ModelArtifact, Predictor,
    SessionDraft, SessionForm,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const DEMO_BUNDLE: &str = include_str!("../demos/hydration_pipeline.json");

/// Captures the row handed to the model and answers with a fixed value.
struct CapturingPredictor {
    answer: f64,
    seen: Mutex<Vec<FeatureVector>>,
}

impl CapturingPredictor {
    fn new(answer: f64) -> Self {
        Self {
            answer,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Predictor for CapturingPredictor {
    fn predict(&self, row: &FeatureVector) -> smart_hydration::Result<f64> {
        self.seen.lock().expect("lock").push(row.clone());
        Ok(self.answer)
    }
}

fn stub_artifact(predictor: Arc<CapturingPredictor>) -> ModelArtifact {
    let vocabulary = Vocabulary::from_fitted(
        &default_app_categ(),
        vec![
            vec!["MALE".to_string(), "FEMALE".to_string()],
            vec!["RUN".to_string(), "STRENGTH".to_string()],
        ],
    );
    ModelArtifact::new(
        predictor,
        default_app_numeric(),
        default_app_categ(),
        vocabulary,
        None,
    )
}

#[test]
fn test_reference_session_reaches_model_unchanged() -> Result<()> {
    let predictor = Arc::new(CapturingPredictor::new(1.8));
    let artifact = stub_artifact(predictor.clone());

    let draft = SessionDraft {
        age: Some(27),
        gender: Some("FEMALE".to_string()),
        exercise_type: Some("RUN".to_string()),
        duration_minutes: Some(60.0),
        weight_kg: Some(60.0),
        height_cm: Some(165.0),
        distance_km: Some(8.0),
        ..SessionDraft::default()
    };
    let session = SessionForm::new(&artifact).submit(&draft)?;
    let recommendation = HydrationEstimator::new(&artifact).estimate(&session)?;

    let seen = predictor.seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    let row = &seen[0];
    assert_eq!(row.age, 27);
    assert_eq!(row.exercise_duration_seconds, 3600);
    assert_eq!(row.distance_m, 8000.0);
    assert!((row.bmi - 60.0 / (1.65 * 1.65)).abs() < 1e-9);
    assert_eq!(format!("{:.2}", row.bmi), "22.04");
    assert!((row.pace_mps - 8000.0 / 3600.0).abs() < 1e-12);
    assert_eq!(row.long_distance_flag, 0);
    assert_eq!(row.effort_score, 1.0);
    assert_eq!(row.gender, "FEMALE");
    assert_eq!(row.exercise_type, "RUN");

    assert_eq!(recommendation.liters.liters(), 1.8);
    assert!(!recommendation.long_distance);
    Ok(())
}

#[test]
fn test_strength_session_drops_stale_distance() -> Result<()> {
    let predictor = Arc::new(CapturingPredictor::new(0.9));
    let artifact = stub_artifact(predictor.clone());

    let draft = SessionDraft {
        exercise_type: Some("strength".to_string()),
        distance_km: Some(21.0),
        ..SessionDraft::default()
    };
    let session = SessionForm::new(&artifact).submit(&draft)?;
    let recommendation = HydrationEstimator::new(&artifact).estimate(&session)?;

    assert_eq!(recommendation.features.distance_m, 0.0);
    assert_eq!(recommendation.features.pace_mps, 0.0);
    assert_eq!(recommendation.features.long_distance_flag, 0);
    assert_eq!(recommendation.features.gender, "FEMALE");
    Ok(())
}

#[test]
fn test_extreme_model_output_is_clamped() -> Result<()> {
    for (raw, expected) in [(10.0, 4.0), (-1.0, 0.2), (4.0, 4.0), (0.2, 0.2)] {
        let artifact = stub_artifact(Arc::new(CapturingPredictor::new(raw)));
        let session = SessionForm::new(&artifact).submit(&SessionDraft::default())?;
        let recommendation = HydrationEstimator::new(&artifact).estimate(&session)?;
        assert_eq!(recommendation.liters.liters(), expected);
        assert_eq!(recommendation.raw_liters, raw);
    }
    Ok(())
}

#[test]
fn test_demo_bundle_from_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("hydration_pipeline.json"), DEMO_BUNDLE)?;

    let store = LocalArtifactStore::new(temp_dir.path().to_str().unwrap().to_string());
    let cache = ArtifactCache::new(store, "hydration_pipeline.json");
    let artifact = cache.get_or_load()?;

    assert_eq!(artifact.gender_options(), ["FEMALE", "MALE"]);
    assert_eq!(artifact.exercise_types().len(), 8);
    assert!(artifact.is_distance_sensitive("RUNNING"));
    assert!(!artifact.is_distance_sensitive("SWIMMING"));

    let form = SessionForm::new(&artifact);
    assert_eq!(form.default_gender(), Some("MALE"));
    assert_eq!(form.default_exercise_type(), Some("CYCLING"));

    let long_run = SessionDraft {
        exercise_type: Some("Running".to_string()),
        duration_minutes: Some(90.0),
        distance_km: Some(15.0),
        temperature_c: Some(28.0),
        ..SessionDraft::default()
    };
    let session = form.submit(&long_run)?;
    let recommendation = HydrationEstimator::new(&artifact).estimate(&session)?;

    assert!(recommendation.long_distance);
    assert!((recommendation.features.effort_score - 1.875).abs() < 1e-12);
    let liters = recommendation.liters.liters();
    assert!((0.2..=4.0).contains(&liters));

    // Loading again hands back the cached artifact
    let again = cache.get_or_load()?;
    assert!(Arc::ptr_eq(&artifact, &again));
    Ok(())
}

#[test]
fn test_feature_table_for_demo_bundle() -> Result<()> {
    let artifact = ModelArtifact::from_slice(DEMO_BUNDLE.as_bytes())?;
    let session = SessionForm::new(&artifact).submit(&SessionDraft {
        exercise_type: Some("WALKING".to_string()),
        ..SessionDraft::default()
    })?;
    let features = HydrationEstimator::new(&artifact).features(&session);

    let mut out = Vec::new();
    write_feature_table(&artifact, &features, &mut out)?;
    let text = String::from_utf8(out)?;
    let rows: Vec<&str> = text.lines().collect();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("Age,Exercise_Duration_Seconds"));
    assert!(rows[1].starts_with("27,3600,18,60,165,8000,"));
    assert!(rows[1].ends_with(",MALE,WALKING"));
    Ok(())
}
