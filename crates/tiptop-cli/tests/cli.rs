use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tiptop"))
}

fn write_config(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).expect("write config");
    path
}

const MINIMAL_INVALID: &str = "[telescope]\nTelescopeDiameter = 8.0\nResolution = 128\n";

fn valid_config() -> String {
    let mut text = String::new();
    text.push_str("[telescope]\nTelescopeDiameter = 8.0\nResolution = 128\n\n");
    text.push_str("[atmosphere]\nWavelength = 500e-9\nSeeing = 0.8\nL0 = 22.0\n\n");
    text.push_str("[sources_science]\nWavelength = [1650e-9]\nZenith = [0.0]\nAzimuth = [0.0]\n\n");
    text.push_str("[sources_HO]\nWavelength = 750e-9\n\n");
    text.push_str("[sensor_science]\nPixelScale = 14\nFieldOfView = 256\n\n");
    text.push_str(
        "[sensor_HO]\nPixelScale = 832\nFieldOfView = 6\nNumberLenslets = [40]\nNumberPhotons = [100]\nSigmaRON = 0.2\n\n",
    );
    text.push_str("[DM]\nNumberActuators = [40]\nDmPitchs = [0.2]\n\n");
    text.push_str("[RTC]\nLoopGain_HO = 0.3\n");
    text
}

#[test]
fn templates_lists_bundled_instruments() {
    cmd()
        .arg("templates")
        .assert()
        .success()
        .stdout(contains("ERIS").and(contains("MICADO_SCAO")));
}

#[test]
fn show_prints_normalized_dialect_text() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(
        &temp,
        "messy.ini",
        "[telescope]\nResolution = 480 ; trailing comment\n",
    );

    cmd()
        .arg("show")
        .arg(config)
        .assert()
        .success()
        .stdout(contains("[telescope]").and(contains("Resolution = 480")));
}

#[test]
fn show_json_outputs_valid_json() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "config.ini", &valid_config());

    let assert = cmd().arg("show").arg(config).arg("--json").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["telescope"]["Resolution"], Value::from(128));
}

#[test]
fn validate_passes_a_complete_config() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "config.ini", &valid_config());

    cmd().arg("validate").arg(config).assert().success();
}

#[test]
fn validate_fails_on_missing_sections() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "partial.ini", MINIMAL_INVALID);

    cmd()
        .arg("validate")
        .arg(config)
        .assert()
        .failure()
        .stdout(contains("ERROR: Missing required section"))
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.ini");

    cmd()
        .arg("validate")
        .arg(missing)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn non_ini_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "config.txt", &valid_config());

    cmd()
        .arg("show")
        .arg(config)
        .assert()
        .failure()
        .stderr(contains("unsupported input format"));
}

#[test]
fn generate_fails_fast_on_unreachable_endpoint() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "config.ini", &valid_config());
    let output = temp.path().join("psf.fits");

    cmd()
        .arg("generate")
        .arg(config)
        .arg("-o")
        .arg(&output)
        .arg("--endpoint")
        .arg("http://127.0.0.1:9/unreachable")
        .arg("--timeout")
        .arg("2")
        .assert()
        .failure()
        .stderr(contains("transport error").and(contains("hint:")));
    assert!(!output.exists());
}

#[test]
fn generate_refuses_invalid_config_before_network() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "partial.ini", MINIMAL_INVALID);
    let output = temp.path().join("psf.fits");

    cmd()
        .arg("generate")
        .arg(config)
        .arg("-o")
        .arg(output)
        .arg("--endpoint")
        .arg("http://127.0.0.1:9/unreachable")
        .assert()
        .failure()
        .stderr(contains("config has errors"));
}

#[test]
fn ping_fails_on_unreachable_endpoint() {
    cmd()
        .arg("ping")
        .arg("--endpoint")
        .arg("http://127.0.0.1:9/unreachable")
        .assert()
        .failure()
        .stderr(contains("unreachable"));
}

#[test]
fn glob_with_multiple_matches_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    write_config(&temp, "one.ini", &valid_config());
    write_config(&temp, "two.ini", &valid_config());
    let pattern = temp.path().join("*.ini");

    cmd()
        .arg("show")
        .arg(pattern)
        .assert()
        .failure()
        .stderr(contains("multiple files match"));
}
