use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;

#[cfg(test)]
mod tests;

pub use args::{
    DemoArgs, ExportArgs, FilterArgs, RecordsArgs, RequestsArgs, SourceArgs, SummaryArgs, WebArgs,
};

#[derive(Debug, Parser)]
#[command(name = "apiwatch")]
#[command(about = "API error-log dashboard engine", version)]
pub struct Cli {
    #[arg(long, default_value = ".apiwatch")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Dashboard view for a source and filter selection.
    Summary(SummaryArgs),
    /// Months present in the source, most recent first.
    Periods(SourceArgs),
    /// Filtered rows, in source order.
    Records(RecordsArgs),
    /// Writes the filtered rows as CSV.
    Export(ExportArgs),
    /// Generates the seeded demo dataset.
    Demo(DemoArgs),
    /// Recent entries of the request log.
    Requests(RequestsArgs),
    /// Serves the dashboard JSON API over HTTP.
    Web(WebArgs),
}
