use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use apiwatch_core::{Apiwatch, DataSource};
use apiwatch_core::error::{ApiwatchError, Result};
use apiwatch_core::load::{DEMO_ROWS, DEMO_SEED, MAX_DEMO_ROWS};
use apiwatch_core::models::{FilterCriteria, Period, Severity, SeveritySelection, TimeWindow};

/// Filter controls carried in the query string.
///
/// `severity` is a comma list; an empty value with `no_severity=true` selects
/// nothing. `from`/`to` and `period` are mutually exclusive.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub severity: Option<String>,
    pub no_severity: Option<bool>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub period: Option<String>,
    pub latest_period: Option<bool>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

impl FilterQuery {
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let severities = if self.no_severity.unwrap_or(false) {
            SeveritySelection::only(Vec::new())
        } else {
            match self.severity.as_deref() {
                Some(raw) => {
                    let levels = raw
                        .split(',')
                        .filter_map(Severity::parse)
                        .collect::<Vec<_>>();
                    if levels.is_empty() {
                        SeveritySelection::All
                    } else {
                        SeveritySelection::only(levels)
                    }
                }
                None => SeveritySelection::All,
            }
        };

        let latest = self.latest_period.unwrap_or(false);
        let ranged = self.from.is_some() || self.to.is_some();
        let selectors = [ranged, self.period.is_some(), latest]
            .into_iter()
            .filter(|selected| *selected)
            .count();
        if selectors > 1 {
            return Err(ApiwatchError::Validation(
                "choose one of from/to, period or latest_period".to_string(),
            ));
        }

        let time = match (self.from, self.to, self.period.as_deref()) {
            (Some(start), Some(end), _) => TimeWindow::date_range(start, end),
            (Some(_), None, _) | (None, Some(_), _) => {
                return Err(ApiwatchError::Validation(
                    "from and to must be given together".to_string(),
                ));
            }
            (None, None, Some(raw)) => TimeWindow::Month {
                period: raw.parse::<Period>().map_err(ApiwatchError::Validation)?,
            },
            (None, None, None) if latest => TimeWindow::LatestPeriod,
            (None, None, None) => TimeWindow::FullHistory,
        };

        Ok(FilterCriteria::default()
            .with_severities(severities)
            .with_time(time)
            .with_error_type(self.error_type.clone()))
    }
}

/// Paging for `GET /api/records`; read alongside [`FilterQuery`].
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub name: String,
}

/// Body of `POST /api/source`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRequest {
    /// A file under the service root; relative paths resolve against it.
    File { path: PathBuf },
    Remote { url: String },
    Demo { rows: Option<usize>, seed: Option<u64> },
    /// The remote URL from configuration.
    Configured,
}

impl SourceRequest {
    pub fn into_source(self, app: &Apiwatch) -> Result<DataSource> {
        match self {
            Self::File { path } => Ok(DataSource::File {
                path: confine_to_root(app.root(), &path)?,
            }),
            Self::Remote { url } => {
                let url = url.trim().to_string();
                if url.is_empty() {
                    return Err(ApiwatchError::Validation("url must not be empty".to_string()));
                }
                Ok(DataSource::Remote { url })
            }
            Self::Demo { rows, seed } => {
                let rows = rows.unwrap_or(DEMO_ROWS);
                if rows == 0 || rows > MAX_DEMO_ROWS {
                    return Err(ApiwatchError::Validation(format!(
                        "demo rows must be between 1 and {MAX_DEMO_ROWS}"
                    )));
                }
                Ok(DataSource::Demo {
                    rows,
                    seed: seed.unwrap_or(DEMO_SEED),
                })
            }
            Self::Configured => app.default_source(),
        }
    }
}

/// Resolves `path` and rejects anything that lands outside `root`, symlinks
/// and `..` segments included.
fn confine_to_root(root: &Path, path: &Path) -> Result<PathBuf> {
    let root = root.canonicalize()?;
    let candidate = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    let resolved = candidate.canonicalize().map_err(|_| {
        ApiwatchError::Validation(format!(
            "file source must be an existing file under the service root: {}",
            path.display()
        ))
    })?;
    if !resolved.starts_with(&root) {
        return Err(ApiwatchError::Validation(format!(
            "file source is outside the service root: {}",
            path.display()
        )));
    }
    Ok(resolved)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: Option<String>,
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
