use anyhow::{Result, bail};

use apiwatch_core::load::MAX_DEMO_ROWS;

use crate::cli::{Commands, FilterArgs};

pub(super) fn validate_command_preflight(command: &Commands) -> Result<()> {
    match command {
        Commands::Summary(args) => validate_filter(&args.filter),
        Commands::Records(args) => {
            if args.limit == Some(0) {
                bail!("--limit must be at least 1");
            }
            validate_filter(&args.filter)
        }
        Commands::Export(args) => validate_filter(&args.filter),
        Commands::Demo(args) => validate_demo_rows(args.rows),
        Commands::Requests(args) => {
            if args.limit == 0 {
                bail!("--limit must be at least 1");
            }
            Ok(())
        }
        Commands::Periods(_) | Commands::Web(_) => Ok(()),
    }
}

pub(super) fn validate_filter(filter: &FilterArgs) -> Result<()> {
    if filter
        .error_type
        .as_deref()
        .is_some_and(|value| value.trim().is_empty())
    {
        bail!("--type must not be blank");
    }
    Ok(())
}

pub(super) fn validate_demo_rows(rows: usize) -> Result<()> {
    if rows == 0 || rows > MAX_DEMO_ROWS {
        bail!("--rows must be within [1, {MAX_DEMO_ROWS}], got {rows}");
    }
    Ok(())
}
