mod common;

use common::{sample_github_corpus, write_lines, StatsBuilder};
use std::cell::Cell;
use std::fs;
use typoforge::api;
use typoforge::cache::{
    cache_path, load, load_or_extract, save, CacheKey, CacheStatus, CachedStatistics,
    CACHE_FORMAT_VERSION,
};
use typoforge::config::Config;
use typoforge::corpus::CorpusSource;
use typoforge::extract::NoProgress;
use typoforge::layouts::KeyboardLayout;
use typoforge::TypoError;

fn key(fingerprint: Option<&str>) -> CacheKey {
    CacheKey {
        source: CorpusSource::Github,
        layout: KeyboardLayout::Qwertz,
        lang: Some("eng".into()),
        lowercase: true,
        corpus_fingerprint: fingerprint.map(str::to_string),
    }
}

#[test]
fn test_cache_file_name() {
    let path = cache_path("/tmp/stats", CorpusSource::Twitter, KeyboardLayout::Azerty);
    assert!(path.ends_with("twitter_stats_azerty.json"));
}

#[test]
fn test_save_then_load_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("github_stats_qwertz.json");

    let mut statistics = StatsBuilder::new()
        .occurs("ab ", 12)
        .adjacent('a', ' ', 3)
        .inserts(' ', '"', 'b', 1)
        .transposes('a', 'b', 2)
        .build();
    statistics.rows_seen = 9;
    statistics.rows_skipped = 2;

    let cached = CachedStatistics {
        version: CACHE_FORMAT_VERSION,
        key: key(Some("abc123")),
        statistics,
    };
    save(&path, &cached).unwrap();

    assert_eq!(load(&path).unwrap(), Some(cached));
}

#[test]
fn test_missing_or_garbled_cache_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("github_stats_qwerty.json");
    assert_eq!(load(&path).unwrap(), None);

    fs::write(&path, "{ definitely not statistics").unwrap();
    assert_eq!(load(&path).unwrap(), None);
}

#[test]
fn test_second_call_hits_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("github_stats_qwertz.json");
    let calls = Cell::new(0);

    let extract = || {
        calls.set(calls.get() + 1);
        Ok::<_, TypoError>(StatsBuilder::new().occurs("z", 5).build())
    };

    let (first, status) = load_or_extract(&path, &key(Some("f1")), extract).unwrap();
    assert_eq!(status, CacheStatus::Rebuilt);

    let (second, status) = load_or_extract(&path, &key(Some("f1")), extract).unwrap();
    assert_eq!(status, CacheStatus::Hit);
    assert_eq!(first, second);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_mismatched_header_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("github_stats_qwertz.json");
    let build = || Ok::<_, TypoError>(StatsBuilder::new().occurs("z", 5).build());

    load_or_extract(&path, &key(Some("f1")), build).unwrap();

    let (_, status) = load_or_extract(&path, &key(Some("f2")), build).unwrap();
    assert_eq!(status, CacheStatus::Rebuilt, "corpus changed");

    let mut other_lang = key(Some("f2"));
    other_lang.lang = None;
    let (_, status) = load_or_extract(&path, &other_lang, build).unwrap();
    assert_eq!(status, CacheStatus::Rebuilt, "language filter changed");

    // corpus file gone: fingerprint unknown, header otherwise matches
    let unknown_corpus = CacheKey {
        corpus_fingerprint: None,
        ..other_lang
    };
    let (_, status) = load_or_extract(&path, &unknown_corpus, build).unwrap();
    assert_eq!(status, CacheStatus::Hit);
}

#[test]
fn test_pipeline_reuses_cached_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_lines(dir.path(), "corpus.jsonl", &sample_github_corpus());

    let mut config = Config::default();
    config.corpus.corpus_path = Some(corpus.to_string_lossy().into_owned());
    config.model.cache_dir = dir.path().to_string_lossy().into_owned();
    config.model.min_count = 1;

    let first = api::load_statistics(&config, &NoProgress).unwrap();
    assert_eq!(first.cache, Some(CacheStatus::Rebuilt));
    assert!(first.load.is_some());
    assert!(dir.path().join("github_stats_qwerty.json").exists());

    let second = api::load_statistics(&config, &NoProgress).unwrap();
    assert_eq!(second.cache, Some(CacheStatus::Hit));
    assert!(second.load.is_none(), "corpus is not re-read on a hit");
    assert_eq!(first.statistics, second.statistics);

    config.model.no_cache = true;
    let direct = api::load_statistics(&config, &NoProgress).unwrap();
    assert_eq!(direct.cache, None);
    assert_eq!(direct.statistics, first.statistics);
}
