mod common;

use common::{mumecli, write_corpus};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new(extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let corpus = dir.path().join("corpus");
        std::fs::create_dir(&corpus).unwrap();
        write_corpus(&corpus);

        let config = dir.path().join("mume.toml");
        let contents = format!(
            "[corpus]\ndir = {:?}\n\n{}",
            corpus.display().to_string(),
            extra
        );
        std::fs::write(&config, contents).unwrap();
        Self { dir, config }
    }
}

#[test]
fn build_reports_every_table() {
    let fx = Fixture::new("");

    mumecli(&fx.config)
        .args(["build", "--top", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 works, 3 parts analyzed, 1 parts skipped"))
        // 7 + 4 + 4 notes
        .stdout(predicate::str::contains("1-note  total 15"))
        .stdout(predicate::str::contains("4-note  total 6"))
        .stdout(predicate::str::contains("harmony  total 7"))
        .stderr(predicate::str::contains("unable to analyze mume"));
}

#[test]
fn build_writes_json_snapshot() {
    let fx = Fixture::new("");
    let out = fx.dir.path().join("db.json");

    mumecli(&fx.config)
        .arg("build")
        .arg("--json")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let one_note = &json["database"]["one_note"];
    let sum: u64 = one_note["counts"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(one_note["total"].as_u64(), Some(sum));
    assert_eq!(json["database"]["harmony"]["counts"]["0700"], 1);
}

#[test]
fn all_pairs_pairing_is_configurable() {
    let fx = Fixture::new("[model]\nharmony_pairing = \"all_pairs\"\n");

    // two voices: every pair is the anchored pair
    mumecli(&fx.config)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("harmony  total 7"));
}

#[test]
fn seeded_samples_repeat() {
    let fx = Fixture::new("[model]\nseed = 11\n");

    let first = mumecli(&fx.config)
        .args(["sample", "--count", "12"])
        .output()
        .unwrap();
    let second = mumecli(&fx.config)
        .args(["sample", "--count", "12"])
        .output()
        .unwrap();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let stdout = String::from_utf8(first.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 12);
    for line in lines {
        assert_eq!(line.len(), 2, "{line}");
        let value: u8 = line.parse().unwrap();
        assert!(value < 12);
    }
}

#[test]
fn config_prints_effective_toml() {
    let fx = Fixture::new("[model]\ninfer_missing_key = true\n");

    mumecli(&fx.config)
        .args(["config", "--log-file", "/tmp/run.log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[corpus]"))
        .stdout(predicate::str::contains("infer_missing_key = true"))
        .stdout(predicate::str::contains("/tmp/run.log"));
}

#[test]
fn log_file_gets_plain_lines() {
    let fx = Fixture::new("");
    let log = fx.dir.path().join("output.txt");

    mumecli(&fx.config)
        .arg("build")
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();

    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("corpus analyzed"));
    assert!(!text.contains('\u{1b}'));
}

#[test]
fn log_file_accumulates_across_runs() {
    let fx = Fixture::new("");
    let log = fx.dir.path().join("output.txt");

    for _ in 0..2 {
        mumecli(&fx.config)
            .arg("build")
            .arg("--log-file")
            .arg(&log)
            .assert()
            .success();
    }

    let text = std::fs::read_to_string(&log).unwrap();
    assert_eq!(text.matches("corpus analyzed").count(), 2);
}

#[test]
fn missing_corpus_fails() {
    let fx = Fixture::new("");

    mumecli(&fx.config)
        .args(["build", "--corpus", "/definitely/not/a/corpus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/definitely/not/a/corpus"));
}

#[test]
fn unknown_pairing_fails() {
    let fx = Fixture::new("[model]\nharmony_pairing = \"triads\"\n");

    mumecli(&fx.config)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown harmony pairing"));
}
