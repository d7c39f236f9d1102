use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use apiwatch_core::{ApiwatchError, DashboardState, DataSource};

use crate::WebState;
use crate::dto::{FilterQuery, HealthResponse, RecordsQuery, SourceRequest, UploadQuery};
use crate::error::{apiwatch_error_response, blocking_task_failed};

pub async fn health(State(state): State<WebState>) -> Response {
    let session = state.session.read().await;
    let payload = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        source: session.source.as_ref().map(DataSource::key),
        rows: session.loaded_rows(),
        last_error: session.last_error.clone(),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

pub async fn load_source(
    State(state): State<WebState>,
    Json(request): Json<SourceRequest>,
) -> Response {
    let source = match request.into_source(&state.app) {
        Ok(source) => source,
        Err(err) => return apiwatch_error_response(err, "source.load", None),
    };
    replace_source(&state, source).await
}

pub async fn upload_source(
    State(state): State<WebState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response {
    let name = query.name.trim().to_string();
    if name.is_empty() {
        return apiwatch_error_response(
            ApiwatchError::Validation("upload name must not be empty".to_string()),
            "source.load",
            None,
        );
    }
    if body.is_empty() {
        return apiwatch_error_response(
            ApiwatchError::Validation("upload body is empty".to_string()),
            "source.load",
            Some(format!("upload:{name}")),
        );
    }
    let source = DataSource::Upload {
        name,
        bytes: body.to_vec(),
    };
    replace_source(&state, source).await
}

/// Loads off the async workers; the session stays write-locked until the new
/// snapshot is in place.
async fn replace_source(state: &WebState, source: DataSource) -> Response {
    let mut session = state.session.write().await;
    let app = Arc::clone(&state.app);
    let mut working = DashboardState::default();
    let loaded = tokio::task::spawn_blocking(move || {
        let report = app.load_source(&mut working, source);
        (report, working)
    })
    .await;

    match loaded {
        Ok((report, next)) => {
            *session = next;
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(err) => blocking_task_failed(&err, "source.load"),
    }
}

pub async fn refresh_source(State(state): State<WebState>) -> Response {
    let mut session = state.session.write().await;
    let app = Arc::clone(&state.app);
    let mut working = session.clone();
    let refreshed = tokio::task::spawn_blocking(move || {
        let report = app.refresh(&mut working);
        (report, working)
    })
    .await;

    match refreshed {
        Ok((Ok(report), next)) => {
            *session = next;
            (StatusCode::OK, Json(report)).into_response()
        }
        Ok((Err(err), _)) => apiwatch_error_response(err, "source.refresh", None),
        Err(err) => blocking_task_failed(&err, "source.refresh"),
    }
}

pub async fn dashboard(State(state): State<WebState>, Query(query): Query<FilterQuery>) -> Response {
    let criteria = match query.criteria() {
        Ok(criteria) => criteria,
        Err(err) => return apiwatch_error_response(err, "dashboard", None),
    };
    let session = state.session.read().await;
    let view = state.app.dashboard(&session, criteria);
    (StatusCode::OK, Json(view)).into_response()
}

pub async fn periods(State(state): State<WebState>) -> Response {
    let session = state.session.read().await;
    match state.app.periods(&session) {
        Ok(periods) => (StatusCode::OK, Json(periods)).into_response(),
        Err(err) => apiwatch_error_response(err, "periods", source_key(&session)),
    }
}

pub async fn records(
    State(state): State<WebState>,
    Query(query): Query<FilterQuery>,
    Query(paging): Query<RecordsQuery>,
) -> Response {
    let criteria = match query.criteria() {
        Ok(criteria) => criteria,
        Err(err) => return apiwatch_error_response(err, "records", None),
    };
    if paging.limit == Some(0) {
        return apiwatch_error_response(
            ApiwatchError::Validation("limit must be at least 1".to_string()),
            "records",
            None,
        );
    }
    let session = state.session.read().await;
    match state.app.records(&session, &criteria, paging.limit) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => apiwatch_error_response(err, "records", source_key(&session)),
    }
}

pub async fn export(
    State(state): State<WebState>,
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
) -> Response {
    let criteria = match query.criteria() {
        Ok(criteria) => criteria,
        Err(err) => return apiwatch_error_response(err, "export", None),
    };
    let session = state.session.read().await;
    let file = match state.app.export(&session, &criteria) {
        Ok(file) => file,
        Err(err) => return apiwatch_error_response(err, "export", source_key(&session)),
    };

    let etag = format!("\"{}\"", blake3::hash(&file.bytes).to_hex());
    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == etag);
    if unchanged {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
            (header::ETAG, etag),
        ],
        file.bytes,
    )
        .into_response()
}

fn source_key(session: &DashboardState) -> Option<String> {
    session.source.as_ref().map(DataSource::key)
}
