//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `mushroom` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use mushroom_classifier::FeatureCatalog;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn cmd() -> Command {
    Command::cargo_bin("mushroom").unwrap()
}

/// Seeded corpus where the label depends on odor alone.
fn write_corpus(path: &Path) {
    let catalog = FeatureCatalog::mushroom();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut file = std::fs::File::create(path).unwrap();

    let mut header = vec!["CLASS".to_string()];
    header.extend(catalog.attributes().iter().map(|a| a.name().to_string()));
    writeln!(file, "{}", header.join(",")).unwrap();

    for _ in 0..300 {
        let mut cells = Vec::new();
        let mut poisonous = false;
        for attribute in catalog.attributes() {
            let value = attribute.values().choose(&mut rng).unwrap();
            if attribute.name() == "ODOR" {
                poisonous = matches!(value.as_str(), "foul" | "pungent" | "fishy" | "musty");
            }
            cells.push(value.clone());
        }
        let label = if poisonous { "poisonous" } else { "edible" };
        writeln!(file, "{},{}", label, cells.join(",")).unwrap();
    }
    // guarantee the scenario the predict tests rely on
    let mut row = vec!["poisonous".to_string()];
    row.extend(catalog.attributes().iter().map(|a| {
        if a.name() == "ODOR" { "foul".to_string() } else { a.default_value().to_string() }
    }));
    writeln!(file, "{}", row.join(",")).unwrap();
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("predict"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mushroom"));
}

// ---------------------------------------------------------------------------
// catalog / schema
// ---------------------------------------------------------------------------

#[test]
fn catalog_lists_attributes() {
    cmd()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("ODOR: pungent, almond"))
        .stdout(predicate::str::contains("HABITAT:"));
}

#[test]
fn schema_prints_indicator_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mushrooms.csv");
    write_corpus(&path);

    cmd()
        .args(["schema", "--data", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ODOR_foul"))
        .stdout(predicate::str::contains("VEIL-TYPE_partial"));
}

#[test]
fn schema_rejects_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mushrooms.txt");
    std::fs::File::create(&path).unwrap();

    cmd()
        .args(["schema", "--data", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains(".tsv or .csv"));
}

// ---------------------------------------------------------------------------
// predict
// ---------------------------------------------------------------------------

#[test]
fn predict_foul_odor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mushrooms.csv");
    write_corpus(&path);

    cmd()
        .args([
            "predict",
            "--data",
            path.to_str().unwrap(),
            "--seed",
            "42",
            "--set",
            "ODOR=foul",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("This mushroom is Poisonous"))
        .stdout(predicate::str::contains("poisonous |"));
}

#[test]
fn predict_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mushrooms.csv");
    write_corpus(&path);

    cmd()
        .args([
            "predict",
            "--data",
            path.to_str().unwrap(),
            "--seed",
            "1",
            "--trees",
            "10",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"probabilities\""))
        .stdout(predicate::str::contains("\"label\""));
}

#[test]
fn predict_unknown_attribute_shows_user_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mushrooms.csv");
    write_corpus(&path);

    cmd()
        .args([
            "predict",
            "--data",
            path.to_str().unwrap(),
            "--seed",
            "1",
            "--trees",
            "5",
            "--set",
            "STEM-GLOW=bright",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'STEM-GLOW' is not a known mushroom characteristic",
        ));
}

#[test]
fn predict_without_seed_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mushrooms.csv");
    write_corpus(&path);

    cmd()
        .args(["predict", "--data", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("seed"));
}

#[test]
fn predict_malformed_set_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mushrooms.csv");
    write_corpus(&path);

    cmd()
        .args([
            "predict",
            "--data",
            path.to_str().unwrap(),
            "--seed",
            "1",
            "--set",
            "ODOR",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ATTRIBUTE=value"));
}

// ---------------------------------------------------------------------------
// config file + overrides
// ---------------------------------------------------------------------------

fn write_config(dir: &Path, train_data: &Path) -> std::path::PathBuf {
    let config = serde_json::json!({
        "train_data": train_data.to_str().unwrap(),
        "model": {
            "seed": 3,
            "model": "decision_tree",
            "max_depth": null,
            "min_samples_split": 2,
            "min_samples_leaf": 1
        }
    });
    let path = dir.join("predict.json");
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn predict_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("mushrooms.csv");
    write_corpus(&data);
    let config = write_config(dir.path(), &data);

    cmd()
        .env("MUSHROOM_LOG", "mushroom=info")
        .args(["predict", "--config", config.to_str().unwrap(), "--set", "ODOR=foul"])
        .assert()
        .success()
        .stdout(predicate::str::contains("This mushroom is Poisonous"))
        .stderr(predicate::str::contains("Training decision_tree with seed 3"));
}

#[test]
fn cli_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("mushrooms.csv");
    write_corpus(&data);
    let config = write_config(dir.path(), &data);

    cmd()
        .env("MUSHROOM_LOG", "mushroom=debug")
        .args([
            "predict",
            "--config",
            config.to_str().unwrap(),
            "--seed",
            "11",
            "--model-type",
            "random_forest",
            "--trees",
            "4",
            "--set",
            "ODOR=foul",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Training random_forest with seed 11"))
        .stderr(predicate::str::contains("Fitted 4 trees"));
}

#[test]
fn data_flag_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("mushrooms.csv");
    write_corpus(&data);
    let config = write_config(dir.path(), &dir.path().join("missing.csv"));

    cmd()
        .args([
            "predict",
            "--config",
            config.to_str().unwrap(),
            "--data",
            data.to_str().unwrap(),
        ])
        .assert()
        .success();
}
