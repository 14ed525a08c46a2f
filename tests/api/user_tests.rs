//! User collection API tests.

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::{body_json, TestApp, SEED_PASSWORD, SEED_USERNAME};

#[tokio::test]
async fn test_list_never_exposes_password_hash() {
    let app = TestApp::new().await;
    app.add_user("alice", "alice-password").await;

    let listed = body_json(app.get("/users?sort=asc.username").await).await;

    assert_eq!(listed["totalEntities"], 2);
    let users = listed["entities"].as_array().unwrap();
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["username"], SEED_USERNAME);
    for user in users {
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = TestApp::new().await;
    let id = app.add_user("alice", "alice-password").await;

    let user = body_json(app.get(&format!("/users/{}", id)).await).await;

    assert_eq!(user["id"], id.to_string());
    assert_eq!(user["firstName"], "Test");
    assert!(user.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_users_cannot_be_created_over_http() {
    let app = TestApp::new().await;
    let body = r#"{"firstName":"Eve","secondName":"Smith","username":"eve","password":"eve-password"}"#;

    let response = app.post("/users", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let listed = body_json(app.get("/users").await).await;
    assert_eq!(listed["totalEntities"], 1);
}

#[tokio::test]
async fn test_users_cannot_be_deleted() {
    let app = TestApp::new().await;
    let me = body_json(app.get("/verification").await).await;

    let response = app
        .delete(&format!("/users/{}", me["id"].as_str().unwrap()))
        .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_edit_self() {
    let app = TestApp::new().await;
    let me = body_json(app.get("/verification").await).await;
    let path = format!("/users/{}", me["id"].as_str().unwrap());

    let response = app.put(&path, r#"{"firstName":"Jonathan"}"#).await;

    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(app.get(&path).await).await;
    assert_eq!(user["firstName"], "Jonathan");
    assert_eq!(user["secondName"], "Sharp");
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let app = TestApp::new().await;
    let me = body_json(app.get("/verification").await).await;
    let path = format!("/users/{}", me["id"].as_str().unwrap());

    let response = app.put(&path, r#"{"password":"a-new-password"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let old = app
        .send(Method::GET, "/verification", Some((SEED_USERNAME, SEED_PASSWORD)), None)
        .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
    let new = app
        .send(Method::GET, "/verification", Some((SEED_USERNAME, "a-new-password")), None)
        .await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_editing_another_user_is_forbidden() {
    let app = TestApp::new().await;
    let alice = app.add_user("alice", "alice-password").await;

    let response = app
        .put(&format!("/users/{}", alice), r#"{"firstName":"Mallory"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let user = body_json(app.get(&format!("/users/{}", alice)).await).await;
    assert_eq!(user["firstName"], "Test");
}
