use std::sync::Arc;

use anyhow::Result;
use apiwatch_core::Apiwatch;

#[derive(Debug, Clone, Copy)]
pub(super) struct WebServeOptions<'a> {
    pub(super) host: &'a str,
    pub(super) port: u16,
}

pub(super) fn serve(app: Arc<Apiwatch>, options: WebServeOptions<'_>) -> Result<()> {
    apiwatch_web::serve_web(app, options.host, options.port)
}
