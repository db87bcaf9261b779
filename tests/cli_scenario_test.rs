//! End-to-end tests for `gridplan scenario`.

mod common;

use assert_cmd::prelude::*;
use common::{fixture, gridplan, stdout_json};
use geojson::GeoJson;
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn base_case_statistics_as_json() {
    let temp = TempDir::new().unwrap();
    let output = gridplan(&temp)
        .args(["scenario", "-f", "json"])
        .arg(fixture("grid_normalised.geojson"))
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(json["scenario"], "Base Case");
    assert_eq!(json["column"], "scenario_1");
    assert_eq!(json["fallback_used"], false);
    assert_eq!(json["feature_count"], 6);
    assert_eq!(json["statistics"]["count"], 5);
    assert_eq!(json["statistics"]["min"], 0.0);
    assert_eq!(json["statistics"]["max"], 1.0);
    assert_eq!(json["statistics"]["median"], 0.5);
    assert_eq!(json["above_threshold"], 1);
    assert_eq!(json["below_threshold"], 5);

    let counts: u64 = json["histogram"]["counts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_u64().unwrap())
        .sum();
    assert_eq!(counts, 5);
    assert_eq!(json["legend"][2]["label"], "No data");
}

#[test]
fn industrial_scenario_with_explicit_threshold() {
    let temp = TempDir::new().unwrap();
    let output = gridplan(&temp)
        .args([
            "scenario",
            "--scenario",
            "Industrial scenario",
            "--threshold",
            "0.5",
            "--bins",
            "4",
            "-f",
            "json",
        ])
        .arg(fixture("grid_normalised.geojson"))
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(json["column"], "scenario_2");
    assert_eq!(json["statistics"]["threshold"], 0.5);
    assert_eq!(json["above_threshold"], 3);
    assert_eq!(json["histogram"]["counts"].as_array().unwrap().len(), 4);
}

#[test]
fn unknown_scenario_is_a_config_error_unless_lenient() {
    let temp = TempDir::new().unwrap();
    let grid = fixture("grid_normalised.geojson");

    let assert = gridplan(&temp)
        .args(["scenario", "--scenario", "High Demand"])
        .arg(&grid)
        .assert()
        .failure()
        .code(3);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("High Demand"), "stderr: {stderr}");

    let output = gridplan(&temp)
        .args(["scenario", "--scenario", "High Demand", "--lenient", "-f", "json"])
        .arg(&grid)
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["fallback_used"], true);
    assert_eq!(json["column"], "scenario_1");
}

#[test]
fn missing_grid_file_names_the_path() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("no_such_grid.geojson");
    let assert = gridplan(&temp)
        .arg("scenario")
        .arg(&missing)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("no_such_grid.geojson"), "stderr: {stderr}");
}

#[test]
fn malformed_geojson_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    gridplan(&temp)
        .arg("scenario")
        .arg(fixture("malformed.geojson"))
        .assert()
        .failure()
        .code(5);
}

#[test]
fn map_output_carries_style_and_highlight() {
    let temp = TempDir::new().unwrap();
    let map = temp.path().join("maps").join("grid.geojson");
    gridplan(&temp)
        .args(["scenario", "--plain", "--map-out"])
        .arg(&map)
        .arg(fixture("grid_normalised.geojson"))
        .assert()
        .success();

    let text = fs::read_to_string(&map).unwrap();
    let collection = match text.parse::<GeoJson>().unwrap() {
        GeoJson::FeatureCollection(fc) => fc,
        other => panic!("expected a feature collection, got {:?}", other),
    };
    assert_eq!(collection.features.len(), 6);

    let style = |i: usize| {
        collection.features[i]
            .foreign_members
            .as_ref()
            .and_then(|m| m.get("style"))
            .cloned()
            .unwrap()
    };
    // scenario_1 = 0.0 is the low end of the ramp
    assert_eq!(style(0)["fillColor"], "#ffffff");
    assert_eq!(style(0)["weight"], 0.2);
    // scenario_1 = 1.0 is above the threshold: red fill, black border
    assert_eq!(style(4)["fillColor"], "#ff0000");
    assert_eq!(style(4)["strokeColor"], "#000000");
    assert_eq!(style(4)["weight"], 2.0);
    // no value
    assert_eq!(style(5)["fillColor"], "#808080");

    let members = collection.foreign_members.unwrap();
    assert_eq!(members["tooltip"]["fields"][0], "scenario_1");
    assert_eq!(members["tooltip"]["aliases"][0], "Value:");
}

#[test]
fn config_file_changes_threshold_fraction() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".gridplan.toml"),
        indoc! {r#"
            [thresholds]
            fraction = 0.5
            histogram_bins = 2
        "#},
    )
    .unwrap();

    let output = gridplan(&temp)
        .args(["scenario", "-f", "json"])
        .arg(fixture("grid_normalised.geojson"))
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["statistics"]["threshold"], 0.5);
    assert_eq!(json["above_threshold"], 3);
    assert_eq!(json["histogram"]["counts"], serde_json::json!([2, 3]));
}

#[test]
fn markdown_report_to_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("scenario.md");
    gridplan(&temp)
        .args(["scenario", "-f", "markdown", "-o"])
        .arg(&out)
        .arg(fixture("grid_normalised.geojson"))
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# Grid Extension Planning Report"));
    assert!(text.contains("## Scenario: Base Case"));
    assert!(text.contains("| Column | `scenario_1` |"));
}
