use crate::cache::{self, CacheKey, CacheStatus};
use crate::config::Config;
use crate::corpus::{self, CorpusSource, LoadReport, Normalization};
use crate::error::TfResult;
use crate::extract::{
    extract_statistics, AnnotatedExtractor, DiffExtractor, EditStatistics, ExtractionProgress,
};
use crate::model::{BuildReport, ModelBuildParams, ProbabilityModel};
use crate::util::calculate_file_hash;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct StatisticsOutcome {
    pub statistics: EditStatistics,
    /// Present only when the corpus was actually read.
    pub load: Option<LoadReport>,
    /// `None` when caching is disabled.
    pub cache: Option<CacheStatus>,
    pub cache_path: Option<PathBuf>,
}

pub fn normalization(config: &Config) -> TfResult<Normalization> {
    Ok(Normalization {
        lowercase: config.corpus.lowercase,
        lang: config.corpus.lang_filter().map(str::to_string),
        layout: config.corpus.keyboard_layout()?,
    })
}

/// Reads the configured corpus and mines it, bypassing any cache.
pub fn extract_from_corpus<P>(
    config: &Config,
    progress: &P,
) -> TfResult<(EditStatistics, LoadReport)>
where
    P: ExtractionProgress + ?Sized,
{
    let norm = normalization(config)?;
    let path = config.corpus.resolved_path()?;

    match config.corpus.source()? {
        CorpusSource::Github => {
            let (pairs, report) = corpus::load_github_file(&path, &norm)?;
            let stats = extract_statistics(&DiffExtractor, &pairs, progress)?;
            Ok((stats, report))
        }
        CorpusSource::Twitter => {
            let (rows, report) = corpus::load_twitter_file(&path, &norm)?;
            let extractor = AnnotatedExtractor {
                layout: norm.layout,
            };
            let stats = extract_statistics(&extractor, &rows, progress)?;
            Ok((stats, report))
        }
    }
}

/// Statistics for `config`, served from the cache when a matching file
/// exists and extracted (then cached) otherwise.
pub fn load_statistics<P>(config: &Config, progress: &P) -> TfResult<StatisticsOutcome>
where
    P: ExtractionProgress + ?Sized,
{
    config.validate()?;

    if config.model.no_cache {
        debug!("cache disabled; extracting directly");
        let (statistics, load) = extract_from_corpus(config, progress)?;
        return Ok(StatisticsOutcome {
            statistics,
            load: Some(load),
            cache: None,
            cache_path: None,
        });
    }

    let source = config.corpus.source()?;
    let layout = config.corpus.keyboard_layout()?;
    let corpus_path = config.corpus.resolved_path()?;
    let key = CacheKey {
        source,
        layout,
        lang: config.corpus.lang_filter().map(str::to_string),
        lowercase: config.corpus.lowercase,
        corpus_fingerprint: calculate_file_hash(&corpus_path).ok(),
    };
    let path = cache::cache_path(&config.model.cache_dir, source, layout);

    let mut load = None;
    let (statistics, status) = cache::load_or_extract(&path, &key, || {
        let (stats, report) = extract_from_corpus(config, progress)?;
        load = Some(report);
        Ok(stats)
    })?;

    Ok(StatisticsOutcome {
        statistics,
        load,
        cache: Some(status),
        cache_path: Some(path),
    })
}

/// Full pipeline: statistics (cached or extracted) through the significance
/// filter into a ready model.
pub fn build_model<P>(
    config: &Config,
    progress: &P,
) -> TfResult<(ProbabilityModel, BuildReport, StatisticsOutcome)>
where
    P: ExtractionProgress + ?Sized,
{
    let outcome = load_statistics(config, progress)?;
    info!(
        "🔧 Building model (threshold {}) from {} rows",
        config.model.min_count, outcome.statistics.rows_seen
    );

    let (model, report) = ModelBuildParams::builder()
        .statistics(outcome.statistics.clone())
        .min_count(config.model.min_count)
        .build()
        .build_with_report()?;

    Ok((model, report, outcome))
}
