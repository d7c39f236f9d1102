use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{ApiwatchError, Result};

/// Fetches the body of a published CSV endpoint.
pub trait CsvFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { http })
    }
}

impl CsvFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        validate_remote_url(url)?;
        let response = self.http.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

pub(crate) fn validate_remote_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }
    Err(ApiwatchError::Validation(format!(
        "remote source must be an http(s) URL: {url}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_http_urls_are_rejected_before_any_request() {
        let fetcher = HttpFetcher::new(500).expect("client");
        let err = fetcher.fetch("file:///etc/passwd").expect_err("must reject");
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn unreachable_host_surfaces_http_error() {
        let fetcher = HttpFetcher::new(500).expect("client");
        let err = fetcher
            .fetch("http://127.0.0.1:9/sheet.csv")
            .expect_err("nothing listens on the discard port");
        assert_eq!(err.code(), "HTTP_ERROR");
    }
}
