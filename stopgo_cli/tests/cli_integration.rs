//! End-to-end CLI tests against generated trace files.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write");
    file.flush().expect("flush");
    file
}

/// Straight 5 m/s transit, a five-minute dwell, and a transit out.
fn commute_csv() -> String {
    let mut out = String::from("ts,x,y\n");
    for i in 0..120 {
        out.push_str(&format!("{},{},0.0\n", i, i * 5));
    }
    for k in 0..300 {
        let angle = k as f64 * GOLDEN_ANGLE;
        out.push_str(&format!(
            "{},{},{}\n",
            120 + k,
            610.0 + 1.5 * angle.cos(),
            1.5 * angle.sin()
        ));
    }
    for i in 0..120 {
        out.push_str(&format!("{},{},0.0\n", 420 + i, 620 + i * 5));
    }
    out
}

fn stopgo() -> Command {
    Command::cargo_bin("stopgo").expect("binary built")
}

#[test]
fn classifies_a_commute_with_human_output() {
    let trace = write_file(&commute_csv());
    stopgo()
        .args(["classify", "--trace"])
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("stop   0"))
        .stdout(predicate::str::contains("1 stops"));
}

#[test]
fn stops_only_suppresses_trips() {
    let trace = write_file(&commute_csv());
    stopgo()
        .args(["classify", "--stops-only", "--trace"])
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("trip   0").not())
        .stdout(predicate::str::contains("stop   0"));
}

#[test]
fn too_short_trace_exits_with_code_3() {
    let trace = write_file("ts,x,y\n0,0,0\n1,5,0\n2,10,0\n");
    stopgo()
        .args(["classify", "--trace"])
        .arg(trace.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("too few unique positions"));
}

#[test]
fn invalid_config_exits_with_code_2() {
    let config = write_file("[bearing]\nthreshold = 500.0\n");
    let trace = write_file(&commute_csv());
    stopgo()
        .arg("--config")
        .arg(config.path())
        .args(["classify", "--trace"])
        .arg(trace.path())
        .assert()
        .code(2);
}

#[test]
fn malformed_headers_are_reported() {
    let trace = write_file("time,lat,lng\n0,1,2\n");
    stopgo()
        .args(["classify", "--trace"])
        .arg(trace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ts,x,y"));
}

#[test]
fn validate_config_accepts_a_good_file() {
    let config = write_file("[stops]\nmin_stop_interval_s = 45.0\n");
    stopgo()
        .arg("--config")
        .arg(config.path())
        .arg("validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration ok"));
}

#[test]
fn validate_config_rejects_a_bad_file() {
    let config = write_file("[rectangle_distance]\nenabled = false\n[bearing]\nenabled = false\n[start_end_distance]\nenabled = false\n");
    stopgo()
        .arg("--config")
        .arg(config.path())
        .arg("validate-config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at least one of"));
}
