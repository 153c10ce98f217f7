use crate::corpus::CorpusSource;
use crate::error::{TfResult, TypoError};
use crate::layouts::KeyboardLayout;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MIN_COUNT: i64 = 1000;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub corpus: CorpusParams,
    #[command(flatten)]
    pub model: ModelParams,
    #[command(flatten)]
    pub generation: GenerationParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusParams {
    /// Corpus format/origin: github | twitter
    #[arg(long, default_value = "github")]
    pub corpus_source: String,
    /// Defaults to the conventional file name of the selected source
    #[arg(long)]
    pub corpus_path: Option<String>,
    /// Keyboard layout applied to corpus text: qwerty | azerty | qwertz
    #[arg(long, default_value = "qwerty")]
    pub layout: String,
    /// Language tag a pair must carry to be kept; empty disables the filter
    #[arg(long, default_value = "eng")]
    pub lang: String,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub lowercase: bool,
}

impl Default for CorpusParams {
    fn default() -> Self {
        Self {
            corpus_source: "github".to_string(),
            corpus_path: None,
            layout: "qwerty".to_string(),
            lang: "eng".to_string(),
            lowercase: true,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Significance threshold: minimum observations before a char/pair is trusted
    #[arg(long, default_value_t = DEFAULT_MIN_COUNT)]
    pub min_count: i64,
    #[arg(long, default_value = ".")]
    pub cache_dir: String,
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            min_count: DEFAULT_MIN_COUNT,
            cache_dir: ".".to_string(),
            no_cache: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Severity weight in (0, 1]
    #[arg(long, default_value_t = 1.0)]
    pub weight: f64,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            weight: 1.0,
            seed: 42,
        }
    }
}

impl CorpusParams {
    pub fn source(&self) -> TfResult<CorpusSource> {
        CorpusSource::parse(&self.corpus_source)
    }

    pub fn keyboard_layout(&self) -> TfResult<KeyboardLayout> {
        KeyboardLayout::parse(&self.layout)
    }

    pub fn resolved_path(&self) -> TfResult<PathBuf> {
        match &self.corpus_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(PathBuf::from(self.source()?.default_file_name())),
        }
    }

    pub fn lang_filter(&self) -> Option<&str> {
        let lang = self.lang.trim();
        if lang.is_empty() {
            None
        } else {
            Some(lang)
        }
    }
}

impl ModelParams {
    pub fn threshold(&self) -> TfResult<u64> {
        validate_threshold(self.min_count)
    }
}

pub fn validate_threshold(min_count: i64) -> TfResult<u64> {
    if min_count <= 0 {
        return Err(TypoError::config(format!(
            "Significance threshold must be positive, got {}",
            min_count
        )));
    }
    Ok(min_count as u64)
}

pub fn validate_weight(weight: f64) -> TfResult<f64> {
    if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
        return Err(TypoError::config(format!(
            "Severity weight must lie in (0, 1], got {}",
            weight
        )));
    }
    Ok(weight)
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            TypoError::config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Fails fast on anything that would otherwise surface mid-pipeline.
    pub fn validate(&self) -> TfResult<()> {
        self.corpus.source()?;
        self.corpus.keyboard_layout()?;
        self.model.threshold()?;
        validate_weight(self.generation.weight)?;
        Ok(())
    }

    /// Copies values the user typed on the command line over file-loaded ones.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(corpus.corpus_source);
        update_if_present!(corpus.corpus_path);
        update_if_present!(corpus.layout);
        update_if_present!(corpus.lang);
        update_if_present!(corpus.lowercase);

        update_if_present!(model.min_count);
        update_if_present!(model.cache_dir);
        update_if_present!(model.no_cache);

        update_if_present!(generation.weight);
        update_if_present!(generation.seed);
    }
}
