//! Integration tests for report ingestion, rendering and the local source.
//!
//! These tests drive the public API end to end with the fixtures under
//! `tests/fixtures`.

use housing_eda::classify::{CorrelationStrength, DriftSeverity, Kurtosis, Skewness};
use housing_eda::render::{LineStyle, PLACEHOLDER, ReferenceStat, VariableCardBody};
use housing_eda::{
    DashboardConfig, ProfilingReport, SelectionGate, build_view_model, classify_kurtosis,
    classify_skewness, correlation_tier, missing_data_stats, source,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_report(filename: &str) -> ProfilingReport {
    let text = std::fs::read_to_string(fixtures_path().join(filename))
        .expect("Failed to read report fixture");
    ProfilingReport::from_json(&text).expect("Failed to parse report fixture")
}

/// A 13-variable numeric report where only `DIS` is skewed.
fn thirteen_variable_report() -> ProfilingReport {
    let names = [
        "CRIM", "ZN", "INDUS", "NOX", "RM", "AGE", "DIS", "RAD", "TAX", "PTRATIO", "B", "LSTAT",
        "MEDV",
    ];
    let variables: serde_json::Map<String, serde_json::Value> = names
        .iter()
        .map(|name| {
            let skewness = if *name == "DIS" { 1.8 } else { 0.2 };
            let variable = json!({
                "type": "Numeric",
                "n_distinct": 400, "n_missing": 0, "p_missing": 0.0,
                "mean": 12.3456, "std": 2.0, "min": 5.0, "max": 20.0,
                "25%": 10.004, "50%": 12.0, "75%": 14.996,
                "skewness": skewness, "kurtosis": 3.0
            });
            (name.to_string(), variable)
        })
        .collect();

    serde_json::from_value(json!({
        "table": {"n": 506, "n_var": 13, "memory_size": 52624, "n_cells_missing": 0,
                  "types": {"Numeric": 13}},
        "variables": variables
    }))
    .expect("Failed to build report")
}

// ============================================================================
// Rendering a Full Artifact
// ============================================================================

#[test]
fn test_render_fixture_report() {
    let report = load_report("housing_profile.json");
    let view = build_view_model(&report, &DashboardConfig::default());

    assert_eq!(view.title, "Boston Housing EDA");
    assert_eq!(view.duration_secs, Some(12.25));
    assert!(view.defects.is_empty(), "unexpected defects: {:?}", view.defects);

    let overview: Vec<(&str, &str)> = view
        .overview
        .iter()
        .map(|card| (card.key.as_str(), card.value.as_str()))
        .collect();
    assert_eq!(
        overview,
        vec![
            ("rows", "507"),
            ("columns", "14"),
            ("memory", "55.55 KB"),
            ("record_size", "112 B"),
            ("missing_cells", "120 (1.69%)"),
            ("vars_with_missing", "3"),
            ("duplicates", "0 (0.00%)"),
        ]
    );

    assert_eq!(view.missing.with_data, 6978);
    assert_eq!(view.missing.missing, 120);
    assert_eq!(view.missing_visuals.len(), 1);
    assert_eq!(view.alerts.len(), 4);
    assert_eq!(view.sample_rows, 2);
    assert_eq!(view.duplicate_rows, 0);
}

#[test]
fn test_fixture_variable_cards() {
    let report = load_report("housing_profile.json");
    let view = build_view_model(&report, &DashboardConfig::default());

    let names: Vec<&str> = view.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["CRIM", "RM", "LSTAT", "MEDV", "CHAS"]);

    let crim = view.variable("CRIM").and_then(|v| v.numeric()).unwrap();
    let skew = crim.skewness.as_ref().unwrap();
    assert_eq!(skew.class, Skewness::RightSkewed);
    assert_eq!(crim.kurtosis.as_ref().unwrap().class, Kurtosis::Leptokurtic);
    assert_eq!(crim.histogram.len(), 3);
    assert_eq!(crim.histogram.iter().map(|b| b.count).sum::<u64>(), 487);

    // LSTAT has no histogram and no iqr; the card derives what it can.
    let lstat = view.variable("LSTAT").and_then(|v| v.numeric()).unwrap();
    assert!(lstat.histogram.is_empty());
    assert!((lstat.iqr.unwrap() - 9.83).abs() < 1e-9);
    assert_eq!(lstat.skewness.as_ref().unwrap().class, Skewness::Symmetric);

    let chas = view.variable("CHAS").unwrap();
    match &chas.body {
        VariableCardBody::Categorical(card) => {
            let labels: Vec<&str> = card.categories.iter().map(|c| c.label.as_str()).collect();
            assert_eq!(labels, vec!["0", "1"]);
            assert_eq!(card.bars.len(), 2);
        }
        other => panic!("expected a categorical card, got {other:?}"),
    }
}

#[test]
fn test_fixture_correlations_and_scatter() {
    let report = load_report("housing_profile.json");
    let view = build_view_model(&report, &DashboardConfig::default());

    let methods: Vec<&str> = view.heatmaps.iter().map(|h| h.method.as_str()).collect();
    assert_eq!(methods, vec!["auto", "pearson"]);

    let pearson = view.heatmap("pearson").unwrap();
    assert_eq!(pearson.features, vec!["CRIM", "RM", "MEDV"]);
    assert_eq!(pearson.top_pairs[0].a, "RM");
    assert_eq!(pearson.top_pairs[0].b, "MEDV");
    assert_eq!(pearson.cells[1][2].strength, CorrelationStrength::Moderate);

    // Self pairs are skipped, the badge reads the pearson matrix.
    assert_eq!(view.scatter.len(), 2);
    assert_eq!(view.scatter[0].caption, "MEDV vs RM");
    assert_eq!(view.scatter[0].badge, "r = 0.70 (moderate)");
    assert_eq!(view.scatter[1].source, "LSTAT");
    assert_eq!(view.scatter[1].correlation, None);
    assert_eq!(view.scatter[1].badge, format!("r = {PLACEHOLDER}"));
}

#[test]
fn test_skewed_variable_among_thirteen() {
    let report = thirteen_variable_report();
    let view = build_view_model(&report, &DashboardConfig::default());

    assert_eq!(view.variables.len(), 13);
    let skewed: Vec<&str> = view
        .variables
        .iter()
        .filter(|card| {
            card.numeric()
                .and_then(|n| n.skewness.as_ref())
                .is_some_and(|s| s.class != Skewness::Symmetric)
        })
        .map(|card| card.name.as_str())
        .collect();
    assert_eq!(skewed, vec!["DIS"]);

    let dis = view.variable("DIS").and_then(|v| v.numeric()).unwrap();
    let badge = dis.skewness.as_ref().unwrap();
    assert_eq!(badge.label, "sesgada a la derecha");
    assert_eq!(badge.icon, "trending-up");
    assert_eq!(badge.color, "#f97316");
    assert_eq!(dis.kurtosis.as_ref().unwrap().label, "normal");

    let lines: Vec<(ReferenceStat, f64)> = dis
        .reference_lines
        .iter()
        .map(|line| (line.stat, line.value))
        .collect();
    assert_eq!(
        lines,
        vec![
            (ReferenceStat::Mean, 12.35),
            (ReferenceStat::Median, 12.0),
            (ReferenceStat::Q1, 10.0),
            (ReferenceStat::Q3, 15.0),
        ]
    );
    assert_eq!(dis.reference_lines[0].style, LineStyle::Solid);
    assert_eq!(dis.reference_lines[0].label, "Media: 12.35");
}

#[test]
fn test_missing_stats_of_large_table() {
    let report: ProfilingReport = serde_json::from_value(json!({
        "table": {"n": 507, "n_var": 14, "n_cells_missing": 120}
    }))
    .unwrap();
    let stats = missing_data_stats(&report.table);
    assert_eq!(stats.with_data, 6978);
    assert_eq!(stats.missing, 120);
    assert_eq!(stats.total(), 507 * 14);
}

#[test]
fn test_classification_boundaries() {
    assert_eq!(correlation_tier(0.40), "moderate");
    assert_eq!(correlation_tier(-0.40), "moderate");
    assert_eq!(correlation_tier(0.39), "weak");
    assert_eq!(correlation_tier(0.70), "moderate");
    assert_eq!(correlation_tier(0.71), "strong");

    assert_eq!(classify_skewness(1.0), "simétrica");
    assert_eq!(classify_skewness(-1.2), "sesgada a la izquierda");
    assert_eq!(classify_kurtosis(3.0), "normal");
    assert_eq!(classify_kurtosis(2.1), "platicúrtica");
}

#[test]
fn test_malformed_artifact_degrades() {
    let report: ProfilingReport = serde_json::from_value(json!({
        "table": {"n": 10, "n_var": 2, "n_cells_missing": 50},
        "variables": {
            "RM": {"type": "Numeric", "25%": 7.0, "50%": 6.0, "75%": 8.0,
                   "histogram": {"counts": [1, 2, 3], "bin_edges": [0.0, 1.0]}}
        },
        "correlations": {
            "pearson": [
                {"RM": 1.0, "MEDV": 0.7},
                {"RM": 0.7}
            ]
        }
    }))
    .unwrap();
    let view = build_view_model(&report, &DashboardConfig::default());

    let locations: Vec<&str> = view.defects.iter().map(|d| d.location.as_str()).collect();
    assert!(locations.contains(&"table"));
    assert!(locations.contains(&"variables.RM.histogram"));
    assert!(locations.contains(&"variables.RM"));
    assert!(locations.contains(&"correlations.pearson"));

    // Degraded, not dropped.
    assert_eq!(view.missing.missing, 20);
    let pearson = view.heatmap("pearson").unwrap();
    assert_eq!(pearson.cells[1][1].label, PLACEHOLDER);
}

// ============================================================================
// Local Profiling
// ============================================================================

#[test]
fn test_profile_fixture_csv() {
    let config = DashboardConfig::default();
    let report = source::profile_csv(fixtures_path().join("housing_sample.csv"), &config)
        .expect("profiling should succeed");

    assert_eq!(report.analysis.title, "housing_sample");
    assert_eq!(report.table.n, 12);
    assert_eq!(report.table.n_var, 6);
    assert_eq!(report.table.n_cells_missing, 1);
    assert_eq!(report.table.types.get("Numeric"), Some(&5));
    assert_eq!(report.table.types.get("Categorical"), Some(&1));

    let lstat = report.variables.get("LSTAT").unwrap();
    assert_eq!(lstat.common().n_missing, 1);
    assert_eq!(lstat.common().count, 11);
    assert_eq!(report.variables.get("ZONE").unwrap().type_name(), "Categorical");

    let alerts = report.alerts.as_ref().unwrap();
    assert!(alerts.iter().any(|a| a.starts_with("LSTAT has 1")));

    // The local artifact renders without defects and survives serialization.
    let view = build_view_model(&report, &config);
    assert!(view.defects.is_empty(), "unexpected defects: {:?}", view.defects);
    let pearson = view.heatmap("pearson").unwrap();
    assert_eq!(pearson.features, vec!["CRIM", "RM", "AGE", "LSTAT", "MEDV"]);
    let spearman = view.heatmap("spearman").unwrap();
    assert_eq!(spearman.features, pearson.features);

    let text = serde_json::to_string(&report).unwrap();
    let reparsed = ProfilingReport::from_json(&text).unwrap();
    assert_eq!(reparsed.variables.len(), 6);
}

#[test]
fn test_analytics_payloads_from_csv() {
    let df = source::load_csv(fixtures_path().join("housing_sample.csv")).unwrap();

    let info = source::dataset_info(&df);
    assert_eq!(info.rows, 12);
    assert_eq!(info.missing_values.get("LSTAT"), Some(&1));

    let distribution = source::distribution(&df, "RM", 4).unwrap();
    assert_eq!(distribution.counts.len(), 4);
    assert_eq!(distribution.bins.len(), 5);
    assert_eq!(distribution.counts.iter().sum::<u64>(), 12);

    let err = source::feature_statistics(&df, "NOPE").unwrap_err();
    assert_eq!(err.error_code(), "FEATURE_NOT_FOUND");
}

// ============================================================================
// Drift
// ============================================================================

#[test]
fn test_frame_drift_between_fixtures() {
    let config = DashboardConfig::default();
    let baseline = source::load_csv(fixtures_path().join("housing_sample.csv")).unwrap();
    let current = source::load_csv(fixtures_path().join("housing_recent.csv")).unwrap();

    let report = source::detect_frame_drift(&baseline, &current, &config).unwrap();

    assert_eq!(report.features.len(), 5);
    assert_eq!(report.drifted_features(), vec!["RM"]);
    assert!((report.drift_score - 0.2).abs() < 1e-12);
    assert!(!report.overall_drift);

    let rows = report.rows(&config.drift_thresholds);
    let rm = rows.iter().find(|r| r.feature == "RM").unwrap();
    assert_eq!(rm.statistic, 1.0);
    assert_eq!(rm.severity, DriftSeverity::High);
    assert_eq!(rm.color, "#ef4444");

    let age = rows.iter().find(|r| r.feature == "AGE").unwrap();
    assert_eq!(age.statistic, 0.0);
    assert_eq!(age.severity, DriftSeverity::Low);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selection_gate_drops_late_responses() {
    let df = source::load_csv(fixtures_path().join("housing_sample.csv")).unwrap();
    let gate = SelectionGate::new();

    let rm_ticket = gate.begin();
    let lstat_ticket = gate.begin();

    // LSTAT answers first, then the stale RM response arrives.
    let lstat = source::feature_statistics(&df, "LSTAT").unwrap();
    assert!(gate.apply(lstat_ticket, lstat));
    let rm = source::feature_statistics(&df, "RM").unwrap();
    assert!(!gate.apply(rm_ticket, rm));

    assert_eq!(gate.current().map(|s| s.feature), Some("LSTAT".to_string()));
    assert_eq!(gate.applied_ticket(), Some(lstat_ticket));
}
