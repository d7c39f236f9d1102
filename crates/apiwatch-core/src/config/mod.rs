use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dashboard::DEFAULT_TOP_MESSAGES;
use crate::error::{ApiwatchError, Result};
use crate::load::DEFAULT_CACHE_TTL_SECS;
use crate::period::MonthLocale;

mod env;

use self::env::{EnvLookup, process_env, read_env_u64_min, read_env_usize_min, read_non_empty_env};

pub const CONFIG_FILE_NAME: &str = "apiwatch.toml";

const ENV_REMOTE_URL: &str = "APIWATCH_REMOTE_URL";
const ENV_FETCH_TIMEOUT_MS: &str = "APIWATCH_FETCH_TIMEOUT_MS";
const ENV_CACHE_TTL_SECS: &str = "APIWATCH_CACHE_TTL_SECS";
const ENV_TOP_MESSAGES: &str = "APIWATCH_TOP_MESSAGES";
const ENV_MONTH_LOCALE: &str = "APIWATCH_MONTH_LOCALE";

pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// On-disk shape of `apiwatch.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    remote_url: Option<String>,
    fetch_timeout_ms: Option<u64>,
    cache_ttl_secs: Option<u64>,
    top_messages: Option<usize>,
    month_locale: Option<String>,
}

/// Resolved settings: environment over config file over defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub remote_url: Option<String>,
    pub fetch_timeout_ms: u64,
    pub cache_ttl_secs: u64,
    pub top_messages: usize,
    pub month_locale: MonthLocale,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            top_messages: DEFAULT_TOP_MESSAGES,
            month_locale: MonthLocale::default(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn file_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Reads `<root>/apiwatch.toml` when present, then the process environment.
    pub fn load(root: &Path) -> Result<Self> {
        Self::resolve(root, &process_env)
    }

    fn resolve(root: &Path, env: EnvLookup<'_>) -> Result<Self> {
        let path = Self::file_path(root);
        let file = match std::fs::read_to_string(&path) {
            Ok(raw) => toml::from_str::<ConfigFile>(&raw).map_err(|err| {
                ApiwatchError::Config(format!("{}: {}", path.display(), err.message()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => ConfigFile::default(),
            Err(err) => return Err(err.into()),
        };
        Self::from_layers(file, env)
    }

    fn from_layers(file: ConfigFile, env: EnvLookup<'_>) -> Result<Self> {
        let defaults = Self::default();

        let file_ttl = file.cache_ttl_secs.map(require_positive_ttl).transpose()?;
        let file_top = file.top_messages.map(require_positive_top).transpose()?;
        let file_timeout = file.fetch_timeout_ms.map(require_positive_timeout).transpose()?;

        let locale_raw = read_non_empty_env(env, ENV_MONTH_LOCALE)
            .map(|raw| (ENV_MONTH_LOCALE, raw))
            .or_else(|| file.month_locale.map(|raw| ("month_locale", raw)));
        let month_locale = match locale_raw {
            Some((origin, raw)) => raw
                .parse::<MonthLocale>()
                .map_err(|err| ApiwatchError::Config(format!("{origin}: {err}")))?,
            None => defaults.month_locale,
        };

        Ok(Self {
            remote_url: read_non_empty_env(env, ENV_REMOTE_URL).or_else(|| {
                file.remote_url
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty())
            }),
            fetch_timeout_ms: read_env_u64_min(env, ENV_FETCH_TIMEOUT_MS, 1)
                .or(file_timeout)
                .unwrap_or(defaults.fetch_timeout_ms),
            cache_ttl_secs: read_env_u64_min(env, ENV_CACHE_TTL_SECS, 1)
                .or(file_ttl)
                .unwrap_or(defaults.cache_ttl_secs),
            top_messages: read_env_usize_min(env, ENV_TOP_MESSAGES, 1)
                .or(file_top)
                .unwrap_or(defaults.top_messages),
            month_locale,
        })
    }
}

fn require_positive_ttl(value: u64) -> Result<u64> {
    if value == 0 {
        return Err(ApiwatchError::Config(
            "cache_ttl_secs must be at least 1".to_string(),
        ));
    }
    Ok(value)
}

fn require_positive_timeout(value: u64) -> Result<u64> {
    if value == 0 {
        return Err(ApiwatchError::Config(
            "fetch_timeout_ms must be at least 1".to_string(),
        ));
    }
    Ok(value)
}

fn require_positive_top(value: usize) -> Result<usize> {
    if value == 0 {
        return Err(ApiwatchError::Config(
            "top_messages must be at least 1".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::resolve(temp.path(), &env_of(&[])).expect("config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.top_messages, 5);
    }

    #[test]
    fn env_overrides_file_values() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "remote_url = \"https://example.invalid/a.csv\"\ncache_ttl_secs = 60\nmonth_locale = \"en\"\n",
        )
        .expect("write config");

        let env = env_of(&[
            (ENV_CACHE_TTL_SECS, "120"),
            (ENV_TOP_MESSAGES, "0"),
        ]);
        let config = AppConfig::resolve(temp.path(), &env).expect("config");

        assert_eq!(
            config.remote_url.as_deref(),
            Some("https://example.invalid/a.csv")
        );
        assert_eq!(config.cache_ttl_secs, 120);
        assert_eq!(config.top_messages, DEFAULT_TOP_MESSAGES);
        assert_eq!(config.month_locale, MonthLocale::En);
    }

    #[test]
    fn invalid_locale_is_a_config_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = AppConfig::resolve(temp.path(), &env_of(&[(ENV_MONTH_LOCALE, "fr")]))
            .expect_err("locale must be rejected");
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn zero_ttl_in_file_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "cache_ttl_secs = 0\n")
            .expect("write config");
        let err = AppConfig::resolve(temp.path(), &env_of(&[])).expect_err("ttl must be >= 1");
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "colour = \"blue\"\n")
            .expect("write config");
        let err = AppConfig::resolve(temp.path(), &env_of(&[])).expect_err("unknown key");
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
