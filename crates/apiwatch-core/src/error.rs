use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ApiwatchError>;

#[derive(Debug, Error)]
pub enum ApiwatchError {
    /// The source could not be read, parsed or fetched.
    #[error("load failed: {0}")]
    Load(String),

    /// A valid load or filter pass produced zero rows.
    #[error("empty result: {0}")]
    EmptyResult(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Workbook(#[from] calamine::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiwatchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Load(_) => "LOAD_FAILED",
            Self::EmptyResult(_) => "EMPTY_RESULT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Config(_) => "CONFIG_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Workbook(_) => "WORKBOOK_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error belongs to the user-facing LoadError family.
    #[must_use]
    pub const fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Load(_)
                | Self::NotFound(_)
                | Self::Io(_)
                | Self::Csv(_)
                | Self::Workbook(_)
                | Self::Http(_)
        )
    }

    pub fn to_payload(&self, operation: impl Into<String>, source: Option<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            source,
            details: None,
        }
    }
}
