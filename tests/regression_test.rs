// tests/regression_test.rs
// End-to-end runs of the tajweedcheck binary on the reference fixture

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Run the binary with an isolated config directory
fn run_tajweedcheck(args: &[&str]) -> Output {
    let config_home = tempfile::tempdir().expect("Failed to create temp dir");
    Command::new(env!("CARGO_BIN_EXE_tajweedcheck"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("TAJWEEDCHECK_CONFIG")
        .output()
        .expect("Failed to execute tajweedcheck")
}

fn json_report(args: &[&str]) -> serde_json::Value {
    let output = run_tajweedcheck(args);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Output is not valid JSON")
}

#[test]
fn test_reference_fixture_json() {
    let path = fixture("reference_recitation.wav");
    let report = json_report(&["--json", path.to_str().unwrap()]);

    assert_eq!(report["sample_rate"], 16000);
    assert_eq!(report["profile"], "fixed_band");
    assert_eq!(report["madd"]["detected"], true);

    let durations = report["madd"]["durations"].as_array().unwrap();
    assert_eq!(durations.len(), 1);
    assert!((durations[0].as_f64().unwrap() - 0.44).abs() < 0.02);

    let variance = report["ghunna"]["variance"].as_f64().unwrap();
    assert!((variance - 3718.1186).abs() < 3718.1186 * 0.01, "variance {}", variance);
    assert_eq!(report["ghunna"]["detected"], false);
    assert_eq!(report["ghunna"]["frames"], 47);
}

#[test]
fn test_variance_band_override() {
    let path = fixture("reference_recitation.wav");
    let report = json_report(&[
        "--json",
        "--min-variance",
        "3600",
        "--max-variance",
        "3800",
        path.to_str().unwrap(),
    ]);

    assert_eq!(report["profile"], "custom");
    assert_eq!(report["ghunna"]["detected"], true);
    assert_eq!(report["ghunna"]["threshold_band"][0], 3600.0);
}

#[test]
fn test_dynamic_profile() {
    let path = fixture("reference_recitation.wav");
    let report = json_report(&["--json", "--profile", "dynamic-threshold", path.to_str().unwrap()]);

    assert_eq!(report["profile"], "dynamic_threshold");
    assert_eq!(report["ghunna"]["mode"], "dynamic_threshold");
    assert_eq!(report["ghunna"]["detected"], true);
}

#[test]
fn test_text_output() {
    let path = fixture("reference_recitation.wav");
    let output = run_tajweedcheck(&[path.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Madd"));
    assert!(stdout.contains("Ghunna"));
    assert!(stdout.contains("reference_recitation"));
}

#[test]
fn test_print_config() {
    let config = json_report(&["--print-config", "--elongation-threshold", "0.5", "unused.wav"]);
    assert_eq!(config["preset"], "custom");
    assert_eq!(config["madd"]["elongation_threshold_s"], 0.5);
    assert_eq!(config["ghunna"]["mode"]["mode"], "fixed_band");
}

#[test]
fn test_invalid_config_exits_with_error() {
    let path = fixture("reference_recitation.wav");
    let output = run_tajweedcheck(&[
        "--min-variance",
        "500",
        "--max-variance",
        "100",
        path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_input_fails() {
    let output = run_tajweedcheck(&["--json", "no/such/file.wav"]);
    assert!(!output.status.success());
}
