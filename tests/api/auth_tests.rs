//! Authentication and CORS API Tests

use axum::http::{header, Method, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::{body_json, TestApp, SEED_PASSWORD, SEED_USERNAME};

#[tokio::test]
async fn test_missing_credentials_on_every_route() {
    let app = TestApp::new().await;
    let thread = app.create_thread("guarded").await;

    for (method, uri) in [
        (Method::GET, "/users".to_string()),
        (Method::GET, "/threads".to_string()),
        (Method::POST, "/threads".to_string()),
        (Method::GET, thread.clone()),
        (Method::PUT, thread.clone()),
        (Method::DELETE, thread.clone()),
        (Method::GET, format!("{}/messages", thread)),
        (Method::GET, "/verification".to_string()),
    ] {
        let response = app
            .send(method.clone(), &uri, None, Some(r#"{"title":"sneaky"}"#))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"entitycoll-test\""
        );
    }

    // Nothing above reached a collection: the thread is untouched and alone.
    let listed = body_json(app.get("/threads").await).await;
    assert_eq!(listed["totalEntities"], 1);
    assert_eq!(listed["entities"][0]["title"], "guarded");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user() {
    let app = TestApp::new().await;

    for credentials in [(SEED_USERNAME, "not-the-password"), ("nobody", SEED_PASSWORD)] {
        let response = app
            .send(Method::GET, "/threads", Some(credentials), None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_verification_returns_identity() {
    let app = TestApp::new().await;

    let response = app.get("/verification").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], SEED_USERNAME);
    assert!(json["id"].as_str().is_some());
}

#[tokio::test]
async fn test_cors_preflight_without_credentials() {
    let app = TestApp::new().await;

    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/threads")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_cors_headers_on_actual_request() {
    let app = TestApp::new().await;

    let mut request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/threads")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(axum::body::Body::empty())
        .unwrap();
    axum_extra::headers::HeaderMapExt::typed_insert(
        request.headers_mut(),
        axum_extra::headers::Authorization::basic(SEED_USERNAME, SEED_PASSWORD),
    );
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}
