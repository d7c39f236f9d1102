use crate::error::Result;
use crate::models::RequestLogTail;

use super::Apiwatch;

impl Apiwatch {
    pub fn list_request_logs(&self, limit: usize) -> Result<RequestLogTail> {
        self.list_request_logs_filtered(limit, None, None)
    }

    pub fn list_request_logs_filtered(
        &self,
        limit: usize,
        operation: Option<&str>,
        status: Option<&str>,
    ) -> Result<RequestLogTail> {
        self.request_log.tail(limit, operation, status)
    }
}
