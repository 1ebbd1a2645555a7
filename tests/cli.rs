use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn sample() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data/EPC_2000_2010.csv")
        .to_string_lossy()
        .into_owned()
}

fn bin() -> Command {
    Command::cargo_bin("epc-chart").unwrap()
}

#[test]
fn help_lists_subcommands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("frames"))
        .stdout(predicate::str::contains("series"));
}

#[test]
fn series_prints_every_country() {
    bin()
        .args(["series", "-i", sample().as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("South Africa  key=South_Africa  visible=true"))
        .stdout(predicate::str::contains("Canada  key=Canada  visible=false"))
        .stdout(predicate::str::contains("missing=1"));
}

#[test]
fn render_writes_settled_svg_with_toggles() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart.svg");
    bin()
        .args(["render", "-i", sample().as_str(), "--show", "Canada", "--hide", "China", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote chart"));
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"id="Canada""#));
}

#[test]
fn unknown_toggle_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart.svg");
    bin()
        .args(["render", "-i", sample().as_str(), "--show", "Atlantis", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown country \"Atlantis\""));
}

#[test]
fn frames_are_numbered() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("cfg.json");
    fs::write(&cfg, r#"{ "entrance_duration_ms": 100 }"#).unwrap();
    bin()
        .args(["frames", "-i", sample().as_str(), "--fps", "20", "--config"])
        .arg(&cfg)
        .arg("--out-dir")
        .arg(dir.path().join("frames"))
        .assert()
        .success();
    let frames = dir.path().join("frames");
    assert!(frames.join("frame_0000.svg").exists());
    assert!(frames.join("frame_0002.svg").exists());
    assert!(!frames.join("frame_0003.svg").exists());
}

#[test]
fn malformed_csv_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("bad.csv");
    fs::write(&csv, "Nation,2000\nChad,1\n").unwrap();
    bin()
        .args(["series", "-i"])
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Country"));
}

#[test]
fn missing_input_fails() {
    bin()
        .args(["series", "-i", "/definitely/not/here.csv"])
        .assert()
        .failure();
}

#[test]
fn snapshot_before_toggles_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart.svg");
    bin()
        .args(["render", "-i", sample().as_str(), "--hide", "China"])
        .args(["--toggle-at-ms", "1500", "--at-ms", "500", "-o"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--at-ms (500)"));
    assert!(!out.exists());
}
