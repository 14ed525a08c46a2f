//! Thread collection API tests: create, read, list, edit, delete.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{body_bytes, body_json, id_of, location, TestApp};

fn titles(listing: &Value) -> Vec<String> {
    listing["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_returns_location_and_empty_body() {
    let app = TestApp::new().await;

    let response = app.post("/threads", r#"{"title":"Hello"}"#).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let path = location(&response);
    assert!(path.starts_with("/threads/"));
    id_of(&path);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = TestApp::new().await;
    let me = body_json(app.get("/verification").await).await;

    let path = app.create_thread("Round trip").await;
    let response = app.get(&path).await;

    assert_eq!(response.status(), StatusCode::OK);
    let thread = body_json(response).await;
    assert_eq!(thread["id"], id_of(&path).to_string());
    assert_eq!(thread["title"], "Round trip");
    assert_eq!(thread["authorId"], me["id"]);
    assert!(thread["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_create_rejects_invalid_bodies() {
    let app = TestApp::new().await;

    for body in ["not json", "{}", r#"{"title":""}"#] {
        let response = app.post("/threads", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
    }
    let listed = body_json(app.get("/threads").await).await;
    assert_eq!(listed["totalEntities"], 0);
}

#[tokio::test]
async fn test_paging_window_and_total() {
    let app = TestApp::new().await;
    for n in 0..5 {
        app.create_thread(&format!("t{}", n)).await;
    }

    let listed = body_json(app.get("/threads?count=2&page=1").await).await;

    assert_eq!(listed["totalEntities"], 5);
    assert_eq!(titles(&listed), vec!["t2", "t3"]);
}

#[tokio::test]
async fn test_default_and_capped_page_size() {
    let app = TestApp::new().await;
    for n in 0..12 {
        app.create_thread(&format!("t{:02}", n)).await;
    }

    let listed = body_json(app.get("/threads").await).await;
    assert_eq!(listed["totalEntities"], 12);
    assert_eq!(titles(&listed).len(), 10);

    let listed = body_json(app.get("/threads?count=1000").await).await;
    assert_eq!(titles(&listed).len(), 12);
}

#[tokio::test]
async fn test_sort_and_property_filters() {
    let app = TestApp::new().await;
    for title in ["b", "d", "a", "c"] {
        app.create_thread(title).await;
    }

    let listed = body_json(app.get("/threads?sort=desc.title").await).await;
    assert_eq!(titles(&listed), vec!["d", "c", "b", "a"]);

    let listed = body_json(app.get("/threads?sort=asc.title&title=gt.a&title=lteq.c").await).await;
    assert_eq!(listed["totalEntities"], 2);
    assert_eq!(titles(&listed), vec!["b", "c"]);

    let listed = body_json(app.get("/threads?title=eq.d").await).await;
    assert_eq!(titles(&listed), vec!["d"]);
}

#[tokio::test]
async fn test_malformed_filter_tokens_are_ignored() {
    let app = TestApp::new().await;
    for title in ["x", "y"] {
        app.create_thread(title).await;
    }

    let response = app
        .get("/threads?page=minus-one&count=lots&sort=sideways.title&title=like.x")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed["totalEntities"], 2);
    assert_eq!(titles(&listed), vec!["x", "y"]);
}

#[tokio::test]
async fn test_unknown_filter_field_is_rejected() {
    let app = TestApp::new().await;

    for uri in ["/threads?sort=asc.colour", "/threads?colour=eq.red"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_edit_leaves_omitted_fields_unchanged() {
    let app = TestApp::new().await;
    let path = app.create_thread("Original").await;

    for body in ["{}", r#"{"title":null}"#, ""] {
        let response = app.put(&path, body).await;
        assert_eq!(response.status(), StatusCode::OK, "{:?}", body);
        assert_eq!(body_json(app.get(&path).await).await["title"], "Original");
    }

    let response = app.put(&path, r#"{"title":"Renamed"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(app.get(&path).await).await["title"], "Renamed");
}

#[tokio::test]
async fn test_only_author_edits_and_deletes() {
    let app = TestApp::new().await;
    app.add_user("mallory", "mallory-password").await;
    let path = app.create_thread("Mine").await;
    let mallory = Some(("mallory", "mallory-password"));

    let response = app
        .send(axum::http::Method::PUT, &path, mallory, Some(r#"{"title":"Hers"}"#))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(axum::http::Method::DELETE, &path, mallory, None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(app.delete(&path).await.status(), StatusCode::OK);
    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_creates_are_both_kept() {
    let app = TestApp::new().await;

    let (first, second) = tokio::join!(
        app.post("/threads", r#"{"title":"left"}"#),
        app.post("/threads", r#"{"title":"right"}"#),
    );

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CREATED);
    assert_ne!(location(&first), location(&second));

    let listed = body_json(app.get("/threads?sort=asc.title").await).await;
    assert_eq!(listed["totalEntities"], 2);
    assert_eq!(titles(&listed), vec!["left", "right"]);
}
