//! Health Check API Tests

use axum::http::{Method, StatusCode};

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_health_check_needs_no_credentials() {
    let app = TestApp::new().await;

    let response = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("version").is_some());
}
