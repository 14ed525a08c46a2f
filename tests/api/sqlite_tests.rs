//! The same API flows over the SQLite backend.

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{body_json, id_of, location, TestApp};

#[tokio::test]
async fn test_thread_lifecycle() {
    let app = TestApp::sqlite().await;

    let path = app.create_thread("Stored").await;
    let thread = body_json(app.get(&path).await).await;
    assert_eq!(thread["title"], "Stored");
    assert_eq!(thread["id"], id_of(&path).to_string());

    assert_eq!(app.put(&path, r#"{"title":"Renamed"}"#).await.status(), StatusCode::OK);
    assert_eq!(app.put(&path, "{}").await.status(), StatusCode::OK);
    assert_eq!(body_json(app.get(&path).await).await["title"], "Renamed");

    assert_eq!(app.delete(&path).await.status(), StatusCode::OK);
    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&path).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_paging_sort_and_filter() {
    let app = TestApp::sqlite().await;
    for n in 0..5 {
        app.create_thread(&format!("t{}", n)).await;
    }

    let listed = body_json(app.get("/threads?count=2&page=1").await).await;
    assert_eq!(listed["totalEntities"], 5);
    assert_eq!(listed["entities"][0]["title"], "t2");
    assert_eq!(listed["entities"][1]["title"], "t3");

    let listed = body_json(app.get("/threads?sort=desc.title&title=lt.t3").await).await;
    assert_eq!(listed["totalEntities"], 3);
    assert_eq!(listed["entities"][0]["title"], "t2");
    assert_eq!(listed["entities"][2]["title"], "t0");
}

#[tokio::test]
async fn test_created_at_filter() {
    let app = TestApp::sqlite().await;
    app.create_thread("old").await;

    let listed = body_json(app.get("/threads?createdAt=gt.2000-01-01T00:00:00Z").await).await;
    assert_eq!(listed["totalEntities"], 1);

    let listed = body_json(app.get("/threads?createdAt=gt.2999-01-01T00:00:00Z").await).await;
    assert_eq!(listed["totalEntities"], 0);

    let response = app.get("/threads?createdAt=gt.yesterday").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_fields_are_rejected() {
    let app = TestApp::sqlite().await;

    for uri in ["/users?sort=asc.passwordHash", "/threads?colour=eq.red"] {
        assert_eq!(app.get(uri).await.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_messages_and_cascade_delete() {
    let app = TestApp::sqlite().await;
    let thread = app.create_thread("Chat").await;

    let response = app
        .post(&format!("{}/messages", thread), r#"{"content":"hi"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let message = location(&response);
    assert!(message.starts_with(&format!("{}/messages/", thread)));

    let listed = body_json(app.get(&format!("{}/messages", thread)).await).await;
    assert_eq!(listed["totalEntities"], 1);
    assert_eq!(listed["entities"][0]["content"], "hi");

    assert_eq!(app.delete(&thread).await.status(), StatusCode::OK);
    assert_eq!(app.get(&message).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_message_needs_existing_thread() {
    let app = TestApp::sqlite().await;

    let response = app
        .post(&format!("/threads/{}/messages", Uuid::new_v4()), r#"{"content":"x"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_and_authentication() {
    let app = TestApp::sqlite().await;
    let alice = app.add_user("alice", "alice-password").await;

    let response = app
        .send(Method::GET, "/verification", Some(("alice", "alice-password")), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], alice.to_string());

    let listed = body_json(app.get("/users?username=eq.alice").await).await;
    assert_eq!(listed["totalEntities"], 1);
    assert!(listed["entities"][0].get("passwordHash").is_none());

    let response = app
        .put(&format!("/users/{}", alice), r#"{"firstName":"Mallory"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_concurrent_partial_user_edits_both_persist() {
    let app = TestApp::sqlite().await;
    let alice = app.add_user("alice", "alice-password").await;
    let path = format!("/users/{}", alice);
    let credentials = Some(("alice", "alice-password"));

    let (first, second) = tokio::join!(
        app.send(Method::PUT, &path, credentials, Some(r#"{"firstName":"Alicia"}"#)),
        app.send(Method::PUT, &path, credentials, Some(r#"{"secondName":"Liddell"}"#)),
    );
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let user = body_json(app.get(&path).await).await;
    assert_eq!(user["firstName"], "Alicia");
    assert_eq!(user["secondName"], "Liddell");
    assert_eq!(user["username"], "alice");
}

#[tokio::test]
async fn test_databases_are_isolated() {
    let first = TestApp::sqlite().await;
    let second = TestApp::sqlite().await;

    first.create_thread("only here").await;

    let listed = body_json(second.get("/threads").await).await;
    assert_eq!(listed["totalEntities"], 0);
}
