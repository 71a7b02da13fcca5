use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use sales_forecast::data::{HistoricalRecord, SalesDataGenerator};
use sales_forecast::features::FeatureVector;
use sales_forecast::models::artifact::{load_model, save_model, ARTIFACT_FORMAT_VERSION};
use sales_forecast::models::{ForecastModel, RandomForestModel, TrainedForecastModel};
use sales_forecast::{ForecastError, GeneratorConfig, ModelConfig, ModelSource, ReadyState, SalesModel};
use std::fs;
use tempfile::tempdir;

fn quick_config() -> ModelConfig {
    ModelConfig {
        n_estimators: 20,
        ..ModelConfig::default()
    }
}

fn seeded_history() -> Vec<HistoricalRecord> {
    SalesDataGenerator::new(GeneratorConfig::seeded(11))
        .unwrap()
        .generate()
        .unwrap()
}

fn february_features() -> Vec<FeatureVector> {
    let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    start.iter_days().take(14).map(FeatureVector::from_date).collect()
}

#[test]
fn test_training_report() {
    let model = RandomForestModel::new(ModelConfig::default()).unwrap();
    let trained = model.train(&seeded_history()).unwrap();
    let report = trained.report();

    assert_eq!(report.train_size, 292);
    assert_eq!(report.test_size, 73);
    assert!(report.mae > 0.0);
    assert!(report.rmse >= report.mae);
    // Noise alone has a standard deviation of 20
    assert!(report.rmse < 120.0, "rmse too high: {}", report.rmse);
}

#[test]
fn test_fixed_data_trains_identically() {
    let model = RandomForestModel::new(quick_config()).unwrap();
    let history = seeded_history();
    let a = model.train(&history).unwrap();
    let b = model.train(&history).unwrap();

    let features = february_features();
    assert_eq!(a.predict(&features).unwrap(), b.predict(&features).unwrap());
    assert_eq!(a.report().mae, b.report().mae);
}

#[test]
fn test_insufficient_data() {
    let model = RandomForestModel::new(quick_config()).unwrap();
    assert!(matches!(
        model.train(&[]),
        Err(ForecastError::InsufficientData(_))
    ));

    let one = vec![HistoricalRecord::new(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), 10.0)];
    assert!(matches!(
        model.train(&one),
        Err(ForecastError::InsufficientData(_))
    ));
}

#[test]
fn test_untrained_model_is_not_ready() {
    let dir = tempdir().unwrap();
    let model = SalesModel::new(
        dir.path().join("model.json"),
        quick_config(),
        GeneratorConfig::seeded(1),
    )
    .unwrap();

    assert!(!model.is_trained());
    assert!(matches!(
        model.predict(&february_features()),
        Err(ForecastError::NotReady(_))
    ));
}

#[test]
fn test_train_writes_artifact_and_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("model.json");

    let mut model = SalesModel::new(&path, quick_config(), GeneratorConfig::seeded(3)).unwrap();
    let report = model.train(None).unwrap();
    assert!(path.exists());
    assert_eq!(model.source(), Some(ModelSource::Trained));

    let artifact = load_model(&path).unwrap();
    assert_eq!(artifact.format_version, ARTIFACT_FORMAT_VERSION);
    assert_eq!(artifact.model.report(), &report);

    let features = february_features();
    let original = model.predict(&features).unwrap();

    let mut restored = SalesModel::new(&path, quick_config(), GeneratorConfig::seeded(99)).unwrap();
    assert_eq!(restored.load_if_available().unwrap(), ReadyState::Loaded);
    assert_eq!(restored.source(), Some(ModelSource::Loaded));

    let reloaded = restored.predict(&features).unwrap();
    for (a, b) in original.iter().zip(&reloaded) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn test_load_falls_back_to_training() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");

    let mut model = SalesModel::new(&path, quick_config(), GeneratorConfig::seeded(5)).unwrap();
    match model.load_if_available().unwrap() {
        ReadyState::Trained(report) => assert_eq!(report.test_size, 73),
        other => panic!("expected training, got {:?}", other),
    }
    assert!(path.exists());
}

#[test]
fn test_corrupt_artifact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, b"{ definitely not a model").unwrap();

    let mut model = SalesModel::new(&path, quick_config(), GeneratorConfig::seeded(5)).unwrap();
    assert!(matches!(
        model.load_if_available(),
        Err(ForecastError::Deserialization(_))
    ));
    assert!(!model.is_trained());
}

#[test]
fn test_artifact_version_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");

    let trained = RandomForestModel::new(quick_config())
        .unwrap()
        .train(&seeded_history())
        .unwrap();
    save_model(&trained, &path).unwrap();

    let mut doc: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    doc["format_version"] = serde_json::json!(ARTIFACT_FORMAT_VERSION + 1);
    fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    assert!(matches!(
        load_model(&path),
        Err(ForecastError::Deserialization(_))
    ));
}

#[test]
fn test_failed_training_keeps_previous_model() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");

    let mut model = SalesModel::new(&path, quick_config(), GeneratorConfig::seeded(8)).unwrap();
    let report = model.train(None).unwrap();

    assert!(model.train(Some(&[])).is_err());
    assert!(model.is_trained());
    assert_eq!(model.training_report(), Some(&report));
}

/// Save a seeded model, let `edit` rewrite its JSON, and try to restore it
fn load_edited(edit: impl FnOnce(&mut serde_json::Value)) -> (SalesModel, Result<ReadyState, ForecastError>) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");

    let trained = RandomForestModel::new(quick_config())
        .unwrap()
        .train(&seeded_history())
        .unwrap();
    save_model(&trained, &path).unwrap();

    let mut doc: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    edit(&mut doc);
    fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    let mut model = SalesModel::new(&path, quick_config(), GeneratorConfig::seeded(5)).unwrap();
    let result = model.load_if_available();
    (model, result)
}

#[test]
fn test_artifact_with_wrong_feature_count() {
    let (model, result) = load_edited(|doc| {
        doc["model"]["forest"]["n_features"] = serde_json::json!(3);
    });
    assert!(matches!(result, Err(ForecastError::Deserialization(_))));
    assert!(!model.is_trained());
}

#[test]
fn test_artifact_without_trees() {
    let (model, result) = load_edited(|doc| {
        doc["model"]["forest"]["trees"] = serde_json::json!([]);
    });
    assert!(matches!(result, Err(ForecastError::Deserialization(_))));
    assert!(!model.is_trained());
}

#[test]
fn test_artifact_tree_without_nodes() {
    let (model, result) = load_edited(|doc| {
        doc["model"]["forest"]["trees"][0]["nodes"] = serde_json::json!([]);
    });
    assert!(matches!(result, Err(ForecastError::Deserialization(_))));
    assert!(!model.is_trained());
}

#[test]
fn test_artifact_child_index_out_of_range() {
    let (model, result) = load_edited(|doc| {
        doc["model"]["forest"]["trees"][0]["nodes"][0] = serde_json::json!({
            "Split": { "feature": 0, "threshold": 0.5, "left": 1, "right": 1_000_000 }
        });
    });
    assert!(matches!(result, Err(ForecastError::Deserialization(_))));
    assert!(!model.is_trained());
}

#[test]
fn test_artifact_split_on_unknown_feature() {
    let (_, result) = load_edited(|doc| {
        doc["model"]["forest"]["trees"][0]["nodes"][0] = serde_json::json!({
            "Split": { "feature": 6, "threshold": 0.5, "left": 1, "right": 2 }
        });
    });
    assert!(matches!(result, Err(ForecastError::Deserialization(_))));
}

#[test]
fn test_unreadable_artifact_is_deserialization_error() {
    let dir = tempdir().unwrap();
    // A directory exists at the path but cannot be read as a file
    let path = dir.path().join("model.json");
    fs::create_dir(&path).unwrap();

    let mut model = SalesModel::new(&path, quick_config(), GeneratorConfig::seeded(5)).unwrap();
    assert!(matches!(
        model.load_if_available(),
        Err(ForecastError::Deserialization(_))
    ));
    assert!(!model.is_trained());
    assert!(path.is_dir());
}
