use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tokio::sync::RwLock;

use apiwatch_core::{Apiwatch, DashboardState};

mod dto;
mod error;
mod handlers;
mod security;

#[cfg(test)]
mod tests;

/// Uploaded workbooks beyond this size are rejected.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) app: Arc<Apiwatch>,
    pub(crate) session: Arc<RwLock<DashboardState>>,
}

impl WebState {
    fn new(app: Arc<Apiwatch>, session: DashboardState) -> Self {
        Self {
            app,
            session: Arc::new(RwLock::new(session)),
        }
    }
}

/// Start the dashboard JSON service and block until shutdown.
///
/// # Errors
/// Returns an error when the runtime cannot be created, the socket cannot be
/// bound, or the server exits with a runtime failure.
pub fn serve_web(app: Arc<Apiwatch>, host: &str, port: u16) -> Result<()> {
    let initial = load_configured_source(&app);
    let state = WebState::new(app, initial);
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        println!("apiwatch dashboard API listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("web server failed")
    })
}

/// Loads the configured remote sheet, if any, before serving.
fn load_configured_source(app: &Apiwatch) -> DashboardState {
    let mut state = DashboardState::default();
    let Ok(source) = app.default_source() else {
        println!("no remote source configured; waiting for POST /api/source or /api/upload");
        return state;
    };
    let report = app.load_source(&mut state, source);
    match (&report.rows, &report.error) {
        (Some(rows), _) => println!("startup load complete: source={} rows={rows}", report.source),
        (None, Some(error)) => println!("startup load failed: {error}"),
        (None, None) => {}
    }
    state
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/source", post(handlers::load_source))
        .route("/api/upload", post(handlers::upload_source))
        .route("/api/refresh", post(handlers::refresh_source))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/periods", get(handlers::periods))
        .route("/api/records", get(handlers::records))
        .route("/api/export", get(handlers::export))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(security::security_headers_middleware))
        .with_state(state)
}
