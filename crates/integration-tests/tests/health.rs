//! Health endpoint tests.

use axum::http::StatusCode;

use stocklist_integration_tests::{TestApp, body_string};

#[tokio::test]
async fn health_reports_ok() {
    let mut app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn readiness_pings_the_database() {
    let mut app = TestApp::new().await;

    let response = app.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}
