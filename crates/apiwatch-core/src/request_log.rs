use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use chrono::Utc;

use crate::error::{ApiwatchError, Result};
use crate::jsonl::{jsonl_all_lines_invalid, parse_jsonl_tolerant};
use crate::models::{RequestLogEntry, RequestLogTail};

pub const REQUEST_LOG_RELATIVE_PATH: &str = "logs/requests.jsonl";

/// Append-only JSONL log of operations. Write failures are swallowed so that
/// logging never changes an operation's outcome.
#[derive(Debug)]
pub struct RequestLog {
    path: PathBuf,
    append_gate: Mutex<()>,
}

impl RequestLog {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(REQUEST_LOG_RELATIVE_PATH),
            append_gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn try_log_request(&self, entry: &RequestLogEntry) {
        let Ok(mut line) = serde_json::to_string(entry) else {
            return;
        };
        line.push('\n');
        let _guard = self
            .append_gate
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ = self.append_line(&line);
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    pub(crate) fn log_request_status(
        &self,
        request_id: String,
        operation: &str,
        status: &str,
        started: Instant,
        source: Option<String>,
        details: Option<serde_json::Value>,
    ) {
        self.try_log_request(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: status.to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            source,
            error_code: None,
            error_message: None,
            details,
        });
    }

    pub(crate) fn log_request_error(
        &self,
        request_id: String,
        operation: &str,
        started: Instant,
        source: Option<String>,
        err: &ApiwatchError,
        details: Option<serde_json::Value>,
    ) {
        self.try_log_request(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: "error".to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            source,
            error_code: Some(err.code().to_string()),
            error_message: Some(err.to_string()),
            details,
        });
    }

    pub(crate) fn log_request_warning(
        &self,
        request_id: String,
        operation: &str,
        started: Instant,
        source: Option<String>,
        warning_message: &str,
        details: Option<serde_json::Value>,
    ) {
        self.try_log_request(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: "warning".to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            source,
            error_code: None,
            error_message: Some(warning_message.to_string()),
            details,
        });
    }

    /// Most recent entries first, optionally narrowed by operation and status.
    pub fn tail(
        &self,
        limit: usize,
        operation: Option<&str>,
        status: Option<&str>,
    ) -> Result<RequestLogTail> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RequestLogTail {
                    entries: Vec::new(),
                    skipped_lines: 0,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let parsed = parse_jsonl_tolerant::<RequestLogEntry>(&raw);
        if parsed.items.is_empty() && parsed.skipped_lines > 0 {
            return Err(jsonl_all_lines_invalid(
                "request log",
                parsed.skipped_lines,
                parsed.first_error.as_ref(),
            ));
        }

        let operation = normalized_filter(operation);
        let status = normalized_filter(status);
        let mut entries = parsed
            .items
            .into_iter()
            .filter(|entry| {
                operation
                    .as_deref()
                    .is_none_or(|op| entry.operation.eq_ignore_ascii_case(op))
                    && status
                        .as_deref()
                        .is_none_or(|st| entry.status.eq_ignore_ascii_case(st))
            })
            .collect::<Vec<_>>();
        entries.reverse();
        entries.truncate(limit.max(1));

        Ok(RequestLogTail {
            entries,
            skipped_lines: parsed.skipped_lines,
        })
    }
}

fn normalized_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_ascii_lowercase)
}
