use axum::http::StatusCode;

use super::harness::{TestHarness, header_value};

#[tokio::test]
async fn api_responses_include_security_headers() {
    let harness = TestHarness::setup();

    let response = harness.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(header_value(headers, "x-content-type-options"), Some("nosniff"));
    assert_eq!(header_value(headers, "x-frame-options"), Some("DENY"));
    assert_eq!(header_value(headers, "referrer-policy"), Some("no-referrer"));
    assert_eq!(header_value(headers, "cache-control"), Some("no-store"));
    let csp = header_value(headers, "content-security-policy").expect("csp header");
    assert!(csp.contains("default-src 'none'"));
    assert!(csp.contains("frame-ancestors 'none'"));
}

#[tokio::test]
async fn error_responses_carry_security_headers_too() {
    let harness = TestHarness::setup();

    let response = harness.get("/api/periods").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        header_value(response.headers(), "x-content-type-options"),
        Some("nosniff")
    );
}
