use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::Result;
use crate::load::{CsvFetcher, HttpFetcher, Loader};
use crate::request_log::RequestLog;

mod dashboard_service;
mod export_service;
mod request_log_service;
mod source_service;

/// Engine facade: configuration, the shared loader and its cache, and the
/// request log. Session state lives outside and is passed in per call.
pub struct Apiwatch {
    root: PathBuf,
    config: AppConfig,
    loader: Loader,
    request_log: RequestLog,
}

impl std::fmt::Debug for Apiwatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Apiwatch")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Apiwatch {
    /// Opens a root directory, reading `apiwatch.toml` and the environment.
    pub fn new(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = root_dir.into();
        fs::create_dir_all(&root)?;
        let config = AppConfig::load(&root)?;
        let fetcher = HttpFetcher::new(config.fetch_timeout_ms)?;
        Ok(Self::with_fetcher(root, config, fetcher))
    }

    pub fn with_fetcher(
        root: impl Into<PathBuf>,
        config: AppConfig,
        fetcher: impl CsvFetcher + 'static,
    ) -> Self {
        let root = root.into();
        let loader = Loader::new(fetcher, config.cache_ttl_secs);
        let request_log = RequestLog::new(&root);
        Self {
            root,
            config,
            loader,
            request_log,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn loader(&self) -> &Loader {
        &self.loader
    }

    #[must_use]
    pub const fn request_log(&self) -> &RequestLog {
        &self.request_log
    }
}
