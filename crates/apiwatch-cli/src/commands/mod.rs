use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use apiwatch_core::export::export_csv;
use apiwatch_core::models::FilterCriteria;
use apiwatch_core::{Apiwatch, DashboardState, DataSource};
use serde_json::json;

use crate::cli::Commands;

mod support;
mod validation;
mod web;


use self::support::{export_target, load_state, print_json, resolve_source};
use self::validation::validate_command_preflight;
use self::web::{WebServeOptions, serve};

pub(crate) fn run_from_root(root: &Path, command: Commands) -> Result<()> {
    validate_command_preflight(&command)?;

    let app = Arc::new(Apiwatch::new(root).context("failed to open apiwatch root")?);
    run_validated(&app, command)
}

fn run_validated(app: &Arc<Apiwatch>, command: Commands) -> Result<()> {
    match command {
        Commands::Summary(args) => {
            let state = load_state(app, resolve_source(app, &args.source)?);
            let view = app.dashboard(&state, args.filter.criteria());
            print_json(&view)?;
        }
        Commands::Periods(args) => {
            let state = load_state(app, resolve_source(app, &args)?);
            let periods = app.periods(&state)?;
            print_json(&periods)?;
        }
        Commands::Records(args) => {
            let state = load_state(app, resolve_source(app, &args.source)?);
            let page = app.records(&state, &args.filter.criteria(), args.limit)?;
            print_json(&page)?;
        }
        Commands::Export(args) => {
            let state = load_state(app, resolve_source(app, &args.source)?);
            let file = app.export(&state, &args.filter.criteria())?;
            let target = export_target(args.out.as_deref(), &file.filename);
            fs::write(&target, &file.bytes)
                .with_context(|| format!("failed to write {}", target.display()))?;
            print_json(&json!({
                "status": "ok",
                "path": target.display().to_string(),
                "rows": file.rows,
            }))?;
        }
        Commands::Demo(args) => {
            let state = load_state(
                app,
                DataSource::Demo {
                    rows: args.rows,
                    seed: args.seed,
                },
            );
            match args.out {
                Some(out) => write_demo_csv(&state, &out)?,
                None => print_json(&app.dashboard(&state, FilterCriteria::default()))?,
            }
        }
        Commands::Requests(args) => {
            let tail = app.list_request_logs_filtered(
                args.limit,
                args.operation.as_deref(),
                args.status.as_deref(),
            )?;
            print_json(&tail)?;
        }
        Commands::Web(args) => serve(
            Arc::clone(app),
            WebServeOptions {
                host: &args.host,
                port: args.port,
            },
        )?,
    }
    Ok(())
}

fn write_demo_csv(state: &DashboardState, out: &Path) -> Result<()> {
    let log = state.require_log()?;
    let bytes = export_csv(log)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(out, bytes).with_context(|| format!("failed to write {}", out.display()))?;
    print_json(&json!({
        "status": "ok",
        "path": out.display().to_string(),
        "rows": log.len(),
    }))
}
