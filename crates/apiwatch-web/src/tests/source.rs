use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};

use super::harness::{TestHarness, decode_json, json_request};

#[tokio::test]
async fn health_reports_empty_session_before_any_load() {
    let harness = TestHarness::setup();

    let body: Value = decode_json(harness.get("/api/health").await).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["source"], Value::Null);
    assert_eq!(body["rows"], Value::Null);

    let view: Value = decode_json(harness.get("/api/dashboard").await).await;
    assert_eq!(view["state"], "no_data");
}

#[tokio::test]
async fn configured_source_loads_remote_sheet() {
    let harness = TestHarness::loaded().await;

    let session = harness.state.session.read().await;
    assert_eq!(session.loaded_rows(), Some(4));
    drop(session);

    let body: Value = decode_json(harness.get("/api/health").await).await;
    assert_eq!(
        body["source"],
        "remote:https://sheets.example.invalid/pub?output=csv"
    );
    assert_eq!(body["rows"], 4);
}

#[tokio::test]
async fn demo_source_honours_rows_and_seed() {
    let harness = TestHarness::setup();

    let response = harness
        .send(json_request(
            "/api/source",
            json!({ "kind": "demo", "rows": 40, "seed": 7 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = decode_json(response).await;
    assert_eq!(report["source"], "demo:7:40");
    assert_eq!(report["rows"], 40);
    assert_eq!(report["from_cache"], false);

    let rejected = harness
        .send(json_request("/api/source", json!({ "kind": "demo", "rows": 0 })))
        .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    let payload: Value = decode_json(rejected).await;
    assert_eq!(payload["code"], "VALIDATION_FAILED");
    assert_eq!(payload["operation"], "source.load");
}

#[tokio::test]
async fn unreadable_file_is_reported_and_degrades_dashboard() {
    let harness = TestHarness::setup();
    std::fs::write(harness.root().join("roto.xlsx"), "not a workbook").expect("seed file");

    let response = harness
        .send(json_request(
            "/api/source",
            json!({ "kind": "file", "path": "roto.xlsx" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = decode_json(response).await;
    assert_eq!(report["rows"], Value::Null);
    assert!(report["error"].is_string());

    let view: Value = decode_json(harness.get("/api/dashboard").await).await;
    assert_eq!(view["state"], "load_failed");

    let periods = harness.get("/api/periods").await;
    assert_eq!(periods.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload: Value = decode_json(periods).await;
    assert_eq!(payload["code"], "LOAD_FAILED");
}

#[tokio::test]
async fn file_source_inside_root_loads() {
    let harness = TestHarness::setup();
    std::fs::write(
        harness.root().join("errores.csv"),
        "fecha,severidad\n2024-03-01 08:00:00,BAJA\n",
    )
    .expect("seed csv");

    let response = harness
        .send(json_request(
            "/api/source",
            json!({ "kind": "file", "path": "errores.csv" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = decode_json(response).await;
    assert_eq!(report["rows"], 1);
}

#[tokio::test]
async fn file_source_outside_root_is_rejected() {
    let harness = TestHarness::setup();
    let outside = tempfile::tempdir().expect("outside dir");
    let secret = outside.path().join("secret.csv");
    std::fs::write(&secret, "fecha,error_message\n2024-03-01 08:00:00,secret-token\n")
        .expect("seed outside file");

    for path in [
        json!(secret.to_string_lossy()),
        json!("../../../../../../../../etc/passwd.csv"),
    ] {
        let response = harness
            .send(json_request("/api/source", json!({ "kind": "file", "path": path })))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: Value = decode_json(response).await;
        assert_eq!(payload["code"], "VALIDATION_FAILED");
    }

    let records = harness.get("/api/records").await;
    assert_eq!(records.status(), StatusCode::BAD_REQUEST);
    let health: Value = decode_json(harness.get("/api/health").await).await;
    assert_eq!(health["source"], Value::Null);
}

#[tokio::test]
async fn upload_parses_csv_body() {
    let harness = TestHarness::setup();
    let csv = "fecha,severidad,tipo_error\n2024-03-01 08:00:00,BAJA,TIMEOUT\n2024-03-02 09:00:00,ALTA,TIMEOUT\n";

    let response = harness
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/upload?name=errores.csv")
                .header("content-type", "text/csv")
                .body(Body::from(csv))
                .expect("upload request"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = decode_json(response).await;
    assert_eq!(report["source"], "upload:errores.csv");
    assert_eq!(report["rows"], 2);

    let empty = harness
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/upload?name=errores.csv")
                .body(Body::empty())
                .expect("empty upload"),
        )
        .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_requires_a_source_then_reloads_it() {
    let harness = TestHarness::setup();

    let rejected = harness
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/refresh")
                .body(Body::empty())
                .expect("refresh request"),
        )
        .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let harness = TestHarness::loaded().await;
    let response = harness
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/refresh")
                .body(Body::empty())
                .expect("refresh request"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = decode_json(response).await;
    assert_eq!(report["rows"], 4);
    assert_eq!(report["from_cache"], false);
}
