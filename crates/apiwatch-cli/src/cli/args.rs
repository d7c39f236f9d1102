use std::path::PathBuf;

use apiwatch_core::load::{DEMO_ROWS, DEMO_SEED};
use apiwatch_core::models::{FilterCriteria, Period, Severity, SeveritySelection, TimeWindow};
use chrono::NaiveDate;
use clap::Args;

/// Where to read the log from. Without a flag the configured remote URL is used.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Local `.csv`, `.xlsx`, `.xls` or `.ods` file.
    #[arg(long, conflicts_with_all = ["url", "demo"])]
    pub file: Option<PathBuf>,
    /// Published-as-CSV spreadsheet URL.
    #[arg(long, conflicts_with = "demo")]
    pub url: Option<String>,
    #[arg(long, default_value_t = false)]
    pub demo: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Keep only these severities; repeatable. Spanish labels are accepted.
    #[arg(long = "severity", value_parser = parse_severity)]
    pub severities: Vec<Severity>,
    /// Explicitly select no severity (empty result).
    #[arg(long, default_value_t = false, conflicts_with = "severities")]
    pub no_severity: bool,
    #[arg(long, value_parser = parse_date, requires = "to")]
    pub from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date, requires = "from")]
    pub to: Option<NaiveDate>,
    /// Month as YYYY-MM.
    #[arg(long, value_parser = parse_period, conflicts_with_all = ["from", "to", "latest_period"])]
    pub period: Option<Period>,
    #[arg(long, default_value_t = false, conflicts_with_all = ["from", "to"])]
    pub latest_period: bool,
    #[arg(long = "type")]
    pub error_type: Option<String>,
}

impl FilterArgs {
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        let severities = if self.no_severity {
            SeveritySelection::only(Vec::new())
        } else if self.severities.is_empty() {
            SeveritySelection::All
        } else {
            SeveritySelection::only(self.severities.iter().cloned())
        };

        let time = match (self.from, self.to, self.period) {
            (Some(start), Some(end), _) => TimeWindow::date_range(start, end),
            (_, _, Some(period)) => TimeWindow::Month { period },
            _ if self.latest_period => TimeWindow::LatestPeriod,
            _ => TimeWindow::FullHistory,
        };

        FilterCriteria::default()
            .with_severities(severities)
            .with_time(time)
            .with_error_type(self.error_type.clone())
    }
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Output file or directory; defaults to the generated name in the current directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    #[arg(long, default_value_t = DEMO_ROWS)]
    pub rows: usize,
    #[arg(long, default_value_t = DEMO_SEED)]
    pub seed: u64,
    /// Write the dataset as CSV instead of printing its dashboard.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RequestsArgs {
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
    #[arg(long)]
    pub operation: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct WebArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8787)]
    pub port: u16,
}

fn parse_severity(raw: &str) -> std::result::Result<Severity, String> {
    Severity::parse(raw).ok_or_else(|| "severity must not be empty".to_string())
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}

fn parse_period(raw: &str) -> std::result::Result<Period, String> {
    raw.parse::<Period>()
}
