mod common;

use common::{sample_github_corpus, write_lines};
use regex::Regex;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    corpus_path: PathBuf,
    input_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let corpus_path = write_lines(dir.path(), "corpus.jsonl", &sample_github_corpus());
        let input = vec![
            "the form was there".to_string(),
            "a cat sat on the mat".to_string(),
            "".to_string(),
            "THE RAT".to_string(),
        ];
        let input_path = write_lines(dir.path(), "input.txt", &input);

        Self {
            dir,
            corpus_path,
            input_path,
        }
    }

    fn cache_dir(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    fn run(&self, args: &[&str]) -> Output {
        let corpus = self.corpus_path.to_string_lossy().into_owned();
        let cache_dir = self.cache_dir();
        let mut full: Vec<&str> = args.to_vec();
        full.extend_from_slice(&[
            "--corpus-path",
            &corpus,
            "--cache-dir",
            &cache_dir,
            "--min-count",
            "1",
        ]);

        Command::new(env!("CARGO_BIN_EXE_typoforge"))
            .args(&full)
            .output()
            .expect("Failed to execute binary")
    }
}

#[test]
fn test_inspect_reports_extraction() {
    let ctx = TestContext::new();
    let output = ctx.run(&["inspect"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows = Regex::new(r"Rows extracted\s+\|\s+(\d+)").unwrap();
    let caps = rows
        .captures(&stdout)
        .unwrap_or_else(|| panic!("no extraction row in:\n{}", stdout));
    assert_eq!(&caps[1], "4");
    assert!(stdout.contains("=== MODEL ==="));
    assert!(ctx.dir.path().join("github_stats_qwerty.json").exists());
}

#[test]
fn test_extract_then_inspect_uses_cache() {
    let ctx = TestContext::new();
    assert!(ctx.run(&["extract"]).status.success());

    let output = ctx.run(&["inspect"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cache ("), "second run should read the cache");
}

#[test]
fn test_corrupt_is_reproducible() {
    let ctx = TestContext::new();
    let input = ctx.input_path.to_string_lossy().into_owned();
    let args = ["corrupt", "--input", &input, "--seed", "123", "--no-cache"];

    let first = ctx.run(&args);
    let second = ctx.run(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let stdout = String::from_utf8_lossy(&first.stdout);
    assert_eq!(stdout.lines().count(), 4, "one output line per input line");
    assert!(
        !ctx.dir.path().join("github_stats_qwerty.json").exists(),
        "--no-cache must not write a cache file"
    );
}

#[test]
fn test_corrupt_report_goes_to_stderr() {
    let ctx = TestContext::new();
    let input = ctx.input_path.to_string_lossy().into_owned();
    let output = ctx.run(&["corrupt", "--input", &input, "--report"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("=== TALLY ==="));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("TALLY"));
}

#[test]
fn test_invalid_options_exit_with_config_error() {
    let ctx = TestContext::new();

    let output = ctx.run(&["inspect", "--layout", "dvorak"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dvorak"));

    let output = ctx.run(&["corrupt", "--weight", "1.5"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_corpus_is_a_run_error() {
    let ctx = TestContext::new();
    let output = Command::new(env!("CARGO_BIN_EXE_typoforge"))
        .args([
            "extract",
            "--corpus-path",
            "/nonexistent/corpus.jsonl",
            "--cache-dir",
            &ctx.cache_dir(),
        ])
        .output()
        .expect("Failed to execute binary");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_file_is_overridden_by_flags() {
    let ctx = TestContext::new();
    let config_path = ctx.dir.path().join("typoforge.json");
    std::fs::write(&config_path, r#"{ "model": { "min_count": 0 } }"#).unwrap();
    let config = config_path.to_string_lossy().into_owned();

    // the file alone carries an invalid threshold; the typed flag wins
    let output = ctx.run(&["inspect", "--config", &config]);
    assert!(output.status.success());
}
