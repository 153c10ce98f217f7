use crate::corpus::CorpusSource;
use crate::error::TfResult;
use crate::extract::EditStatistics;
use crate::layouts::KeyboardLayout;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Bumped whenever the layout of cached statistics changes.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// What a cached file must agree on to be reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    pub source: CorpusSource,
    pub layout: KeyboardLayout,
    pub lang: Option<String>,
    pub lowercase: bool,
    /// SHA-256 of the corpus file, when it was readable.
    pub corpus_fingerprint: Option<String>,
}

impl CacheKey {
    /// A missing fingerprint on either side is not a mismatch, so a cache
    /// stays usable after the corpus file is moved away.
    pub fn accepts(&self, cached: &CacheKey) -> bool {
        let fingerprints_agree = match (&self.corpus_fingerprint, &cached.corpus_fingerprint) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        self.source == cached.source
            && self.layout == cached.layout
            && self.lang == cached.lang
            && self.lowercase == cached.lowercase
            && fingerprints_agree
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedStatistics {
    pub version: u32,
    #[serde(flatten)]
    pub key: CacheKey,
    pub statistics: EditStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    /// No usable cache; statistics were extracted and written.
    Rebuilt,
}

pub fn cache_path<P: AsRef<Path>>(dir: P, source: CorpusSource, layout: KeyboardLayout) -> PathBuf {
    dir.as_ref()
        .join(format!("{}_stats_{}.json", source, layout))
}

/// `Ok(None)` when the file does not exist or cannot be parsed.
pub fn load(path: &Path) -> TfResult<Option<CachedStatistics>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(cached) => Ok(Some(cached)),
        Err(e) => {
            warn!("⚠️  Ignoring unreadable cache {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Writes through a temp file in the target directory, then renames it into
/// place so readers never observe a partial file.
pub fn save(path: &Path, cached: &CachedStatistics) -> TfResult<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer(&mut writer, cached)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Returns cached statistics for `key` if a matching file exists at `path`,
/// otherwise runs `extract` and persists its result.
pub fn load_or_extract<F>(
    path: &Path,
    key: &CacheKey,
    extract: F,
) -> TfResult<(EditStatistics, CacheStatus)>
where
    F: FnOnce() -> TfResult<EditStatistics>,
{
    if let Some(cached) = load(path)? {
        if cached.version == CACHE_FORMAT_VERSION && key.accepts(&cached.key) {
            info!("📦 Cache hit: {}", path.display());
            return Ok((cached.statistics, CacheStatus::Hit));
        }
        warn!(
            "⚠️  Stale cache {} (version {}, source {}, layout {}); rebuilding",
            path.display(),
            cached.version,
            cached.key.source,
            cached.key.layout
        );
    } else {
        info!("📦 Cache miss: {}", path.display());
    }

    let statistics = extract()?;
    let cached = CachedStatistics {
        version: CACHE_FORMAT_VERSION,
        key: key.clone(),
        statistics,
    };
    save(path, &cached)?;
    info!("💾 Statistics cached to {}", path.display());

    Ok((cached.statistics, CacheStatus::Rebuilt))
}
