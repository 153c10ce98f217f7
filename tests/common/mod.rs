#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use typoforge::extract::EditStatistics;
use typoforge::model::{ModelBuildParams, ProbabilityModel};

/// Fluent builder for raw statistics so tests can state exact counts.
#[derive(Default)]
pub struct StatsBuilder {
    stats: EditStatistics,
}

impl StatsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occurs(mut self, chars: &str, n: u64) -> Self {
        for c in chars.chars() {
            self.stats.occurrences.insert(c, n);
        }
        self
    }

    pub fn adjacent(mut self, a: char, b: char, n: u64) -> Self {
        self.stats.adjacency.insert((a, b), n);
        self
    }

    pub fn deletes(mut self, c: char, n: u64) -> Self {
        self.stats.deletions.insert(c, n);
        self
    }

    pub fn substitutes(mut self, original: char, typo: char, n: u64) -> Self {
        self.stats.substitutions.insert((original, typo), n);
        self
    }

    pub fn inserts(mut self, before: char, inserted: char, after: char, n: u64) -> Self {
        self.stats.insertions.insert((before, inserted, after), n);
        self
    }

    pub fn transposes(mut self, first: char, second: char, n: u64) -> Self {
        self.stats.transpositions.insert((first, second), n);
        self
    }

    pub fn build(self) -> EditStatistics {
        self.stats
    }

    pub fn model(self, min_count: i64) -> ProbabilityModel {
        ModelBuildParams::builder()
            .statistics(self.stats)
            .min_count(min_count)
            .build()
            .build_model()
            .expect("model should build")
    }
}

/// One JSONL record holding a single (typo, clean) edit.
pub fn github_line(typo: &str, clean: &str, lang: &str) -> String {
    serde_json::json!({
        "repo": "octo/test",
        "edits": [{
            "src": { "text": typo, "lang": lang },
            "tgt": { "text": clean, "lang": lang }
        }]
    })
    .to_string()
}

pub fn write_lines(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).expect("create fixture");
    for line in lines {
        writeln!(f, "{}", line).expect("write fixture");
    }
    path
}

/// A small github-style corpus with one of each edit kind.
pub fn sample_github_corpus() -> Vec<String> {
    vec![
        github_line("the cat", "the cart", "eng"),
        github_line("teh cart", "the cart", "eng"),
        github_line("the cut", "the cat", "eng"),
        github_line("the caat", "the cat", "eng"),
        github_line("le chat", "le chien", "fra"),
        "{not json".to_string(),
    ]
}
