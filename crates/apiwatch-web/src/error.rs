use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use apiwatch_core::ApiwatchError;

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn apiwatch_error_response(
    err: ApiwatchError,
    operation: &str,
    source: Option<String>,
) -> Response {
    let status = status_for_apiwatch_error(&err);
    let mut payload = err.to_payload(operation.to_string(), source);
    if err.is_load_failure() {
        payload.details = Some(json!({ "hint": "load a source with POST /api/source or /api/upload" }));
    }
    (status, Json(payload)).into_response()
}

pub fn blocking_task_failed(err: &tokio::task::JoinError, operation: &str) -> Response {
    apiwatch_error_response(
        ApiwatchError::Internal(format!("background task failed: {err}")),
        operation,
        None,
    )
}

fn status_for_apiwatch_error(err: &ApiwatchError) -> StatusCode {
    match err {
        ApiwatchError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiwatchError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiwatchError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND
        }
        ApiwatchError::EmptyResult(_)
        | ApiwatchError::Load(_)
        | ApiwatchError::Csv(_)
        | ApiwatchError::Workbook(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApiwatchError::Http(_) => StatusCode::BAD_GATEWAY,
        ApiwatchError::Config(_)
        | ApiwatchError::Io(_)
        | ApiwatchError::Json(_)
        | ApiwatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
