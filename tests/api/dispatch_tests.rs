//! Root dispatcher and path resolution tests.

use axum::http::{header, Method, StatusCode};
use uuid::Uuid;

use crate::common::{body_json, id_of, TestApp, SEED_PASSWORD, SEED_USERNAME};

#[tokio::test]
async fn test_unknown_resource_is_not_found() {
    let app = TestApp::new().await;

    for uri in [
        "/forums".to_string(),
        format!("/forums/{}", Uuid::new_v4()),
        "/".to_string(),
    ] {
        let response = app.get(&uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_malformed_identifiers_are_client_errors() {
    let app = TestApp::new().await;
    let thread = app.create_thread("t").await;

    for uri in [
        "/threads/not-a-uuid".to_string(),
        format!("{}/messages/not-a-uuid", thread),
        "/threads/not-a-uuid/messages".to_string(),
        format!("/threads/{}/x/messages", Uuid::new_v4()),
        format!("/users/{}/messages", Uuid::new_v4()),
        format!("/messages/{}", Uuid::new_v4()),
    ] {
        let response = app.get(&uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = body_json(response).await;
        assert!(json["message"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_malformed_identifier_is_rejected_before_edit() {
    let app = TestApp::new().await;
    let thread = app.create_thread("unchanged").await;

    let response = app.put("/threads/nope", r#"{"title":"changed"}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(app.get(&thread).await).await;
    assert_eq!(json["title"], "unchanged");
}

#[tokio::test]
async fn test_unsupported_verbs() {
    let app = TestApp::new().await;
    let thread = app.create_thread("t").await;

    let response = app
        .send(
            Method::PATCH,
            &thread,
            Some((SEED_USERNAME, SEED_PASSWORD)),
            Some("{}"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, PUT, DELETE");

    let response = app.delete("/threads").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, POST");

    let response = app.post(&thread, "{}").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let app = TestApp::new().await;
    let missing = format!("/threads/{}", Uuid::new_v4());

    assert_eq!(app.get(&missing).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        app.put(&missing, r#"{"title":"x"}"#).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&missing).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resource_named_path_reads_as_collection() {
    let app = TestApp::new().await;
    let thread = app.create_thread("t").await;

    // `/threads/<id>/messages` must not be mistaken for a message id.
    let response = app.get(&format!("/threads/{}/messages", id_of(&thread))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["totalEntities"], 0);
}
