//! Integration tests for the JSON API.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tubarr::config::Config;

async fn spawn_app() -> (Router, String) {
    let db_path =
        std::env::temp_dir().join(format!("tubarr-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = tubarr::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");

    let api_key = state
        .store()
        .get_user_api_key("admin")
        .await
        .expect("failed to fetch api key")
        .expect("missing bootstrap api key");

    (tubarr::api::router(state).await, api_key)
}

async fn send_json(
    app: &Router,
    api_key: &str,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", api_key);

    let request = if let Some(json) = body {
        builder = builder.header("Content-Type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

#[tokio::test]
async fn test_auth_required() {
    let (app, api_key) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(&app, &api_key, "GET", "/api/system/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_playlist_category_crud() {
    let (app, api_key) = spawn_app().await;

    let (status, body) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlist-categories",
        Some(serde_json::json!({"name": "Rust"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    // Duplicate names conflict
    let (status, _) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlist-categories",
        Some(serde_json::json!({"name": "Rust"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Empty names are rejected
    let (status, _) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlist-categories",
        Some(serde_json::json!({"name": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        send_json(&app, &api_key, "GET", "/api/playlist-categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Rust");
    assert_eq!(categories[0]["playlist_count"], 0);

    let (status, body) = send_json(
        &app,
        &api_key,
        "PUT",
        &format!("/api/playlist-categories/{id}"),
        Some(serde_json::json!({"name": "Rust Lang"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Rust Lang");

    let (status, _) = send_json(
        &app,
        &api_key,
        "DELETE",
        &format!("/api/playlist-categories/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        &api_key,
        "DELETE",
        &format!("/api/playlist-categories/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_playlist_flow() {
    let (app, api_key) = spawn_app().await;

    let (_, body) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlist-categories",
        Some(serde_json::json!({"name": "Learning"})),
    )
    .await;
    let category_id = body["data"]["id"].as_i64().unwrap();

    // URL without a list parameter is rejected
    let (status, _) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlists",
        Some(serde_json::json!({
            "title": "Bad",
            "url": "https://www.youtube.com/watch?v=abc",
            "categories": [category_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Playlists must belong to at least one category
    let (status, _) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlists",
        Some(serde_json::json!({
            "title": "No categories",
            "url": "https://www.youtube.com/playlist?list=PLnone",
            "categories": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlists",
        Some(serde_json::json!({
            "title": "Rust Course",
            "description": "Full tutorial",
            "url": "https://www.youtube.com/playlist?list=PL123",
            "categories": [category_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let playlist_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["categories"][0]["name"], "Learning");

    // Same URL again conflicts
    let (status, _) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlists",
        Some(serde_json::json!({
            "title": "Duplicate",
            "url": "https://www.youtube.com/playlist?list=PL123",
            "categories": [category_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(
        &app,
        &api_key,
        "GET",
        &format!("/api/playlist-categories/{category_id}/playlists"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Search narrows the listing
    let (_, body) = send_json(
        &app,
        &api_key,
        "GET",
        &format!("/api/playlist-categories/{category_id}/playlists?search=nomatch"),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Global playlist search on the category index
    let (_, body) = send_json(
        &app,
        &api_key,
        "GET",
        "/api/playlist-categories?playlist_search=tutorial&playlist_field=description",
        None,
    )
    .await;
    assert_eq!(body["data"]["found_playlists"].as_array().unwrap().len(), 1);

    let (status, body) = send_json(
        &app,
        &api_key,
        "PUT",
        &format!("/api/playlists/{playlist_id}"),
        Some(serde_json::json!({
            "title": "Rust Course 2e",
            "url": "https://www.youtube.com/playlist?list=PL123",
            "categories": [category_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Rust Course 2e");
    assert_eq!(body["data"]["description"], serde_json::Value::Null);

    let (status, _) = send_json(
        &app,
        &api_key,
        "DELETE",
        &format!("/api/playlists/{playlist_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        &api_key,
        "DELETE",
        &format!("/api/playlists/{playlist_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_channel_url_validation() {
    let (app, api_key) = spawn_app().await;

    let (_, body) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/channel-categories",
        Some(serde_json::json!({"name": "Dev"})),
    )
    .await;
    let category_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/channels",
        Some(serde_json::json!({
            "name": "Not a channel",
            "url": "https://www.youtube.com/watch?v=abc",
            "categories": [category_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/channels",
        Some(serde_json::json!({
            "name": "Traversy Media",
            "url": "https://www.youtube.com/@TraversyMedia",
            "categories": [category_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categories"][0]["name"], "Dev");

    let (status, body) = send_json(
        &app,
        &api_key,
        "GET",
        &format!("/api/channel-categories/{category_id}/channels"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Traversy Media");

    let (_, body) = send_json(&app, &api_key, "GET", "/api/channel-categories", None).await;
    assert_eq!(body["data"][0]["channel_count"], 1);
}

#[tokio::test]
async fn test_system_status_counts() {
    let (app, api_key) = spawn_app().await;

    let (_, body) = send_json(&app, &api_key, "GET", "/api/system/status", None).await;
    assert_eq!(body["data"]["playlists"], 0);
    assert_eq!(body["data"]["channels"], 0);

    let (_, body) = send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlist-categories",
        Some(serde_json::json!({"name": "Misc"})),
    )
    .await;
    let category_id = body["data"]["id"].as_i64().unwrap();

    send_json(
        &app,
        &api_key,
        "POST",
        "/api/playlists",
        Some(serde_json::json!({
            "title": "Counted",
            "url": "https://www.youtube.com/playlist?list=PLcount",
            "categories": [category_id],
        })),
    )
    .await;

    let (_, body) = send_json(&app, &api_key, "GET", "/api/system/status", None).await;
    assert_eq!(body["data"]["playlists"], 1);
    assert_eq!(body["data"]["playlist_categories"], 1);
}
