use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiwatchError, Result};
use crate::models::ErrorLog;

mod cache;
mod csv_table;
mod demo;
mod remote;
mod table;
mod timestamp;
mod workbook;

pub use cache::{CachedLog, DEFAULT_CACHE_TTL_SECS, SourceCache};
pub use demo::{DEMO_ROWS, DEMO_SEED, MAX_DEMO_ROWS};
pub use remote::{CsvFetcher, HttpFetcher};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use workbook::PREFERRED_SHEETS;

use self::table::RawTable;

/// Where a log snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    File {
        path: PathBuf,
    },
    Upload {
        name: String,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    Remote {
        url: String,
    },
    Demo {
        rows: usize,
        seed: u64,
    },
}

impl DataSource {
    #[must_use]
    pub fn demo() -> Self {
        Self::Demo {
            rows: DEMO_ROWS,
            seed: DEMO_SEED,
        }
    }

    /// Cache key and log label.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::File { path } => format!("file:{}", path.display()),
            Self::Upload { name, .. } => format!("upload:{name}"),
            Self::Remote { url } => format!("remote:{url}"),
            Self::Demo { rows, seed } => format!("demo:{seed}:{rows}"),
        }
    }

    const fn is_cached(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    fn from_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(ApiwatchError::Validation(format!(
                "unsupported source format: {name} (expected .csv, .xlsx, .xls or .ods)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedLog {
    pub log: Arc<ErrorLog>,
    pub from_cache: bool,
}

/// Non-failing load result: either a log or a message for a degraded view.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub log: Option<Arc<ErrorLog>>,
    pub error: Option<String>,
    pub from_cache: bool,
}

impl LoadOutcome {
    /// Folds a load result into the degraded-view form.
    #[must_use]
    pub fn from_result(source: &DataSource, result: Result<LoadedLog>) -> Self {
        match result {
            Ok(loaded) => Self {
                log: Some(loaded.log),
                error: None,
                from_cache: loaded.from_cache,
            },
            Err(err) => Self {
                log: None,
                error: Some(describe_load_error(source, &err)),
                from_cache: false,
            },
        }
    }
}

pub struct Loader {
    fetcher: Box<dyn CsvFetcher>,
    cache: Mutex<SourceCache>,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

impl Loader {
    pub fn new(fetcher: impl CsvFetcher + 'static, cache_ttl_secs: u64) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            cache: Mutex::new(SourceCache::new(cache_ttl_secs)),
        }
    }

    pub fn load(&self, source: &DataSource, now: DateTime<Utc>) -> Result<LoadedLog> {
        let key = source.key();
        if source.is_cached()
            && let Some(hit) = self.lock_cache().get(&key, now)
        {
            return Ok(LoadedLog {
                log: hit.log,
                from_cache: true,
            });
        }

        let log = Arc::new(self.read_source(source, now)?.into_error_log());
        if source.is_cached() {
            self.lock_cache().insert(key, Arc::clone(&log), now);
        }
        Ok(LoadedLog {
            log,
            from_cache: false,
        })
    }

    pub fn try_load(&self, source: &DataSource, now: DateTime<Utc>) -> LoadOutcome {
        LoadOutcome::from_result(source, self.load(source, now))
    }

    /// Drops the cached snapshot so the next load fetches again.
    pub fn invalidate(&self, source: &DataSource) -> bool {
        self.lock_cache().invalidate(&source.key())
    }

    pub fn invalidate_all(&self) {
        self.lock_cache().invalidate_all();
    }

    #[must_use]
    pub fn is_stale(&self, source: &DataSource, now: DateTime<Utc>) -> bool {
        self.lock_cache().is_stale(&source.key(), now)
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, SourceCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_source(&self, source: &DataSource, now: DateTime<Utc>) -> Result<RawTable> {
        match source {
            DataSource::File { path } => {
                let name = path.to_string_lossy();
                let format = SourceFormat::from_name(&name)?;
                let bytes = std::fs::read(path).map_err(|err| match err.kind() {
                    std::io::ErrorKind::NotFound => {
                        ApiwatchError::NotFound(path.display().to_string())
                    }
                    _ => ApiwatchError::Io(err),
                })?;
                parse_bytes(format, bytes)
            }
            DataSource::Upload { name, bytes } => {
                parse_bytes(SourceFormat::from_name(name)?, bytes.clone())
            }
            DataSource::Remote { url } => csv_table::read_csv_table(&self.fetcher.fetch(url)?),
            DataSource::Demo { rows, seed } => Ok(demo::demo_table(
                *rows,
                *seed,
                now.with_timezone(&Local).naive_local(),
            )),
        }
    }
}

fn parse_bytes(format: SourceFormat, bytes: Vec<u8>) -> Result<RawTable> {
    match format {
        SourceFormat::Csv => csv_table::read_csv_table(&bytes),
        SourceFormat::Workbook => workbook::read_workbook_bytes(bytes),
    }
}

fn describe_load_error(source: &DataSource, err: &ApiwatchError) -> String {
    match source {
        DataSource::Remote { url } => format!("could not fetch remote sheet {url}: {err}"),
        DataSource::File { path } => format!("could not load {}: {err}", path.display()),
        DataSource::Upload { name, .. } => format!("could not load uploaded file {name}: {err}"),
        DataSource::Demo { .. } => format!("could not build demo data: {err}"),
    }
}
