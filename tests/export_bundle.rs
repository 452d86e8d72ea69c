use chrono::{TimeZone, Utc};
use ivi_insight::config::{ExportConfig, GenerationConfig};
use ivi_insight::tabular::Table;
use ivi_insight::workflows::dataset;
use ivi_insight::workflows::export::{
    self, ExportDefaults, ExportError, OptionalInput, EXPORT_WORKBOOK, GUIDE_FILE, MODEL_FILE,
};
use std::fs;
use std::path::Path;

fn generated_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn generate_into(data_dir: &Path) -> dataset::GenerationReport {
    let config = GenerationConfig {
        seed: 42,
        data_dir: data_dir.to_path_buf(),
        provider_roster: None,
    };
    dataset::run(&config, generated_at()).expect("dataset generates")
}

fn export_config(root: &Path) -> ExportConfig {
    ExportConfig {
        data_dir: root.join("data"),
        export_dir: root.join("data").join("powerbi"),
        provider_roster: None,
    }
}

#[test]
fn export_writes_the_full_bundle_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = export_config(dir.path());
    let report = generate_into(&config.data_dir);

    let manifest = export::run(&config, &ExportDefaults::default(), generated_at())
        .expect("export succeeds");

    assert_eq!(
        manifest.sheets,
        vec![
            "Summary",
            "IVI_Scores",
            "Future_Predictions",
            "Recommendations",
            "Feature_Importance",
            "Risk_Distribution",
            "Client_Analysis",
            "Provider_Info",
            "Provider_Analysis",
            "Provider_By_Region",
            "DAX_Measures",
        ]
    );
    for name in [
        EXPORT_WORKBOOK,
        "ivi_scores.csv",
        "future_predictions.csv",
        "recommendations.csv",
        "feature_importance.csv",
        "provider_info.csv",
        "client_analysis.csv",
        MODEL_FILE,
        GUIDE_FILE,
    ] {
        assert!(config.export_dir.join(name).is_file(), "{name} written");
    }
    assert!(manifest.presence.future_ivi.is_none());

    let analysis =
        Table::from_path(config.export_dir.join("client_analysis.csv")).expect("analysis reads");
    assert_eq!(analysis.len(), report.dataset.scores.len());
    let improvement = analysis.column("IMPROVEMENT").expect("default improvement");
    let advice = analysis.column("RECOMMENDATIONS").expect("default recommendation");
    assert!(analysis.rows().iter().all(|row| row[improvement] == "5"));
    assert!(analysis
        .rows()
        .iter()
        .all(|row| row[advice] == "Review and optimize"));

    let providers =
        Table::from_path(config.export_dir.join("provider_info.csv")).expect("providers read");
    assert_eq!(providers.headers()[0], "Prov Code");
    assert_eq!(providers.len(), report.dataset.providers.len());

    let guide = fs::read_to_string(config.export_dir.join(GUIDE_FILE)).expect("guide reads");
    assert!(guide.contains("Generated: 2025-01-15 09:00:00 UTC"));
}

#[test]
fn export_joins_model_outputs_when_present() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = export_config(dir.path());
    let report = generate_into(&config.data_dir);
    let first = &report.dataset.scores[0].cont_no;

    fs::write(
        config.data_dir.join(OptionalInput::FuturePredictions.file_name()),
        format!("CONT_NO,Future_IVI_Score,Improvement\n{first},88.5,3.5\n"),
    )
    .expect("predictions written");
    fs::write(
        config.data_dir.join(OptionalInput::FeatureImportance.file_name()),
        "Feature,Importance\nLOSS_RATIO,0.42\nCHRONIC_RATE,0.18\n",
    )
    .expect("importance written");

    let manifest = export::run(&config, &ExportDefaults::default(), generated_at())
        .expect("export succeeds");
    assert_eq!(manifest.presence.future_ivi.as_deref(), Some("Future_IVI_Score"));
    assert!(manifest.presence.recommendations.is_none());

    let analysis =
        Table::from_path(config.export_dir.join("client_analysis.csv")).expect("analysis reads");
    let future = analysis.column("Future_IVI_Score").expect("joined future column");
    let improvement = analysis.column("Improvement").expect("joined improvement");
    assert_eq!(analysis.rows()[0][future], "88.5");
    assert_eq!(analysis.rows()[0][improvement], "3.5");
    assert_eq!(analysis.rows()[1][future], "");
    assert!(analysis.column("FUTURE_IVI_SCORE").is_none());

    let importance = Table::from_path(config.export_dir.join("feature_importance.csv"))
        .expect("importance reads");
    let percent = importance
        .column("Importance_Percent")
        .expect("percent column");
    assert_eq!(importance.rows()[0][percent], "42");

    let model: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(config.export_dir.join(MODEL_FILE)).expect("model reads"),
    )
    .expect("model parses");
    assert_eq!(model["tables"][1]["name"], "Future_Predictions");
    assert_eq!(model["tables"][1]["columns"][1], "Future_IVI_Score");
    assert_eq!(model["relationships"][0]["cardinality"], "Many-to-One");
}

#[test]
fn missing_scores_abort_the_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = export_config(dir.path());

    let err = export::run(&config, &ExportDefaults::default(), generated_at())
        .expect_err("scores are required");
    match err {
        ExportError::MissingInput { path } => assert!(path.ends_with("ivi_scores.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_roster_aborts_the_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = export_config(dir.path());
    generate_into(&config.data_dir);
    fs::remove_file(config.data_dir.join("providers.csv")).expect("roster removed");

    let err = export::run(&config, &ExportDefaults::default(), generated_at())
        .expect_err("roster is required");
    assert!(matches!(err, ExportError::MissingInput { .. }));
}
