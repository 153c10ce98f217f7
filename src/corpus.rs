use crate::error::{TfResult, TypoError};
use crate::layouts::KeyboardLayout;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, info};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    EnumIter,
    EnumString,
    Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum CorpusSource {
    /// Line-delimited JSON of (src, tgt) edits mined from commit histories.
    #[default]
    Github,
    /// Tab-separated typo log with explicit operation tags.
    Twitter,
}

impl CorpusSource {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Github => "github-typo-corpus.v1.0.0.jsonl",
            Self::Twitter => "typo-corpus-r1.txt",
        }
    }

    pub fn parse(name: &str) -> TfResult<Self> {
        Self::from_str(name.trim()).map_err(|_| {
            let known: Vec<String> = Self::iter().map(|v| v.to_string()).collect();
            TypoError::config(format!(
                "Unknown corpus source '{}' (expected one of: {})",
                name,
                known.join(", ")
            ))
        })
    }
}

/// One observed (clean, typo'd) text pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusPair {
    pub original_text: String,
    pub original_lang: Option<String>,
    pub typo_text: String,
    pub typo_lang: Option<String>,
}

impl CorpusPair {
    pub fn new(original: impl Into<String>, typo: impl Into<String>) -> Self {
        Self {
            original_text: original.into(),
            original_lang: None,
            typo_text: typo.into(),
            typo_lang: None,
        }
    }
}

/// One row of a tagged typo log. `symbol` is still in its markup form
/// (`(x)`, `[a:b]`, `[a/b]`, `b<x>a`); it is decoded during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedTypo {
    pub operation: String,
    pub symbol: String,
    pub original_context: String,
}

#[derive(Debug, Clone, Default)]
pub struct Normalization {
    pub lowercase: bool,
    pub lang: Option<String>,
    pub layout: KeyboardLayout,
}

impl Normalization {
    pub fn text(&self, raw: &str) -> String {
        let lowered = if self.lowercase {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };
        self.layout.apply(&lowered)
    }

    fn keeps(&self, tag: Option<&str>) -> bool {
        match &self.lang {
            // an untagged pair never matches a requested language
            Some(wanted) => tag == Some(wanted.as_str()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub filtered_lang: usize,
    pub records: usize,
}

#[derive(Deserialize)]
struct GithubLine {
    edits: Vec<GithubEdit>,
}

#[derive(Deserialize)]
struct GithubEdit {
    src: GithubSide,
    tgt: GithubSide,
}

#[derive(Deserialize)]
struct GithubSide {
    text: Option<String>,
    #[serde(default)]
    lang: Option<String>,
}

pub fn load_github_pairs<R: BufRead>(
    reader: R,
    norm: &Normalization,
) -> TfResult<(Vec<CorpusPair>, LoadReport)> {
    let mut pairs = Vec::new();
    let mut report = LoadReport::default();

    for line in reader.lines() {
        let line = line?;
        report.lines_read += 1;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: GithubLine = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                debug!("[Line {}] skipping malformed record: {}", report.lines_read, e);
                report.lines_skipped += 1;
                continue;
            }
        };

        for edit in parsed.edits {
            let (Some(src), Some(tgt)) = (edit.src.text, edit.tgt.text) else {
                report.lines_skipped += 1;
                continue;
            };
            if !norm.keeps(edit.src.lang.as_deref()) {
                report.filtered_lang += 1;
                continue;
            }
            pairs.push(CorpusPair {
                original_text: norm.text(&tgt),
                original_lang: edit.tgt.lang,
                typo_text: norm.text(&src),
                typo_lang: edit.src.lang,
            });
        }
    }

    report.records = pairs.len();
    Ok((pairs, report))
}

pub fn load_github_file<P: AsRef<Path>>(
    path: P,
    norm: &Normalization,
) -> TfResult<(Vec<CorpusPair>, LoadReport)> {
    let path = path.as_ref();
    info!("📂 Loading github typo corpus: {}", path.display());
    let file = File::open(path)?;
    let (pairs, report) = load_github_pairs(BufReader::new(file), norm)?;
    info!(
        "   -> {} pairs kept, {} filtered by language, {} malformed lines",
        report.records, report.filtered_lang, report.lines_skipped
    );
    Ok((pairs, report))
}

/// Clean context column looks like `the_quick_fox(12)`.
fn clean_context(raw: &str) -> String {
    raw.split('(').next().unwrap_or("").replace('_', " ")
}

pub fn load_twitter_rows<R: Read>(
    reader: R,
    norm: &Normalization,
) -> TfResult<(Vec<AnnotatedTypo>, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut report = LoadReport::default();

    for result in rdr.records() {
        report.lines_read += 1;
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                debug!("[Row {}] CSV Parse Error: {}", report.lines_read, e);
                report.lines_skipped += 1;
                continue;
            }
        };
        if rec.len() < 6 {
            report.lines_skipped += 1;
            continue;
        }

        let lowered = |s: &str| {
            if norm.lowercase {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };

        rows.push(AnnotatedTypo {
            operation: rec[2].trim().to_string(),
            symbol: lowered(&rec[3]),
            original_context: norm.text(&clean_context(&rec[5])),
        });
    }

    report.records = rows.len();
    Ok((rows, report))
}

pub fn load_twitter_file<P: AsRef<Path>>(
    path: P,
    norm: &Normalization,
) -> TfResult<(Vec<AnnotatedTypo>, LoadReport)> {
    let path = path.as_ref();
    info!("📂 Loading twitter typo corpus: {}", path.display());
    let file = File::open(path)?;
    let (rows, report) = load_twitter_rows(file, norm)?;
    info!(
        "   -> {} rows kept, {} malformed rows",
        report.records, report.lines_skipped
    );
    Ok((rows, report))
}
