//! Message collection API tests: messages live under their thread.

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{body_bytes, body_json, id_of, location, TestApp};

async fn post_message(app: &TestApp, thread: &str, content: &str) -> String {
    let response = app
        .post(
            &format!("{}/messages", thread),
            &serde_json::json!({ "content": content }).to_string(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let path = location(&response);
    assert!(body_bytes(response).await.is_empty());
    path
}

#[tokio::test]
async fn test_create_returns_nested_location() {
    let app = TestApp::new().await;
    let thread = app.create_thread("Chat").await;

    let path = post_message(&app, &thread, "hi").await;

    let prefix = format!("{}/messages/", thread);
    assert!(path.starts_with(&prefix), "{} under {}", path, prefix);
    id_of(&path);
}

#[tokio::test]
async fn test_get_by_nested_path() {
    let app = TestApp::new().await;
    let thread = app.create_thread("Chat").await;
    let path = post_message(&app, &thread, "hello there").await;

    let response = app.get(&path).await;

    assert_eq!(response.status(), StatusCode::OK);
    let message = body_json(response).await;
    assert_eq!(message["id"], id_of(&path).to_string());
    assert_eq!(message["threadId"], id_of(&thread).to_string());
    assert_eq!(message["content"], "hello there");
}

#[tokio::test]
async fn test_list_is_scoped_to_thread() {
    let app = TestApp::new().await;
    let first = app.create_thread("first").await;
    let second = app.create_thread("second").await;
    for content in ["a", "b", "c"] {
        post_message(&app, &first, content).await;
    }
    post_message(&app, &second, "elsewhere").await;

    let listed = body_json(app.get(&format!("{}/messages", first)).await).await;

    assert_eq!(listed["totalEntities"], 3);
    let contents: Vec<&str> = listed["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_list_filters_within_thread() {
    let app = TestApp::new().await;
    let thread = app.create_thread("Chat").await;
    for content in ["alpha", "beta", "gamma"] {
        post_message(&app, &thread, content).await;
    }

    let uri = format!("{}/messages?sort=desc.content&content=gt.alpha", thread);
    let listed = body_json(app.get(&uri).await).await;

    assert_eq!(listed["totalEntities"], 2);
    assert_eq!(listed["entities"][0]["content"], "gamma");
    assert_eq!(listed["entities"][1]["content"], "beta");
}

#[tokio::test]
async fn test_missing_thread_is_not_found() {
    let app = TestApp::new().await;
    let thread = format!("/threads/{}", Uuid::new_v4());

    let response = app
        .post(&format!("{}/messages", thread), r#"{"content":"orphan"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get(&format!("{}/messages", thread)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_top_level_messages_need_a_thread() {
    let app = TestApp::new().await;

    let response = app.post("/messages", r#"{"content":"where am I"}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_author_edits_and_deletes() {
    let app = TestApp::new().await;
    app.add_user("mallory", "mallory-password").await;
    let mallory = Some(("mallory", "mallory-password"));
    let thread = app.create_thread("Chat").await;
    let path = post_message(&app, &thread, "original").await;

    let response = app
        .send(Method::PUT, &path, mallory, Some(r#"{"content":"forged"}"#))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = app.send(Method::DELETE, &path, mallory, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(app.get(&path).await).await["content"], "original");

    let response = app.put(&path, r#"{"content":"edited"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(app.get(&path).await).await["content"], "edited");

    assert_eq!(app.delete(&path).await.status(), StatusCode::OK);
    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_may_reply() {
    let app = TestApp::new().await;
    app.add_user("alice", "alice-password").await;
    let thread = app.create_thread("Open thread").await;

    let response = app
        .send(
            Method::POST,
            &format!("{}/messages", thread),
            Some(("alice", "alice-password")),
            Some(r#"{"content":"reply"}"#),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_deleting_thread_removes_messages() {
    let app = TestApp::new().await;
    let thread = app.create_thread("Doomed").await;
    let message = post_message(&app, &thread, "gone soon").await;

    assert_eq!(app.delete(&thread).await.status(), StatusCode::OK);

    assert_eq!(app.get(&message).await.status(), StatusCode::NOT_FOUND);
}
