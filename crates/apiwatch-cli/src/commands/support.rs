use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use apiwatch_core::{Apiwatch, DashboardState, DataSource};

use crate::cli::SourceArgs;

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Explicit flag first, then the configured remote sheet.
pub(super) fn resolve_source(app: &Apiwatch, args: &SourceArgs) -> Result<DataSource> {
    if let Some(path) = &args.file {
        return Ok(DataSource::File { path: path.clone() });
    }
    if let Some(url) = &args.url {
        return Ok(DataSource::Remote {
            url: url.trim().to_string(),
        });
    }
    if args.demo {
        return Ok(DataSource::demo());
    }
    app.default_source()
        .map_err(|err| anyhow::anyhow!("{err}; or pass --file, --url or --demo"))
}

pub(super) fn load_state(app: &Apiwatch, source: DataSource) -> DashboardState {
    let mut state = DashboardState::default();
    let report = app.load_source(&mut state, source);
    if let Some(error) = &report.error {
        eprintln!("warning: {error}");
    }
    state
}

/// `out` may name a file or an existing directory.
pub(super) fn export_target(out: Option<&Path>, filename: &str) -> PathBuf {
    match out {
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(filename),
    }
}
