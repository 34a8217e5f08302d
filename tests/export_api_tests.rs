//! HTTP-level tests for the export routes

mod common;

use axum::http::StatusCode;
use chimp::prelude::*;
use common::{demo_app, demo_config};

const ROUTES: [&str; 6] = [
    "/chimp-api/",
    "/chimp-api/posts",
    "/chimp-api/users",
    "/chimp-api/comments",
    "/chimp-api/media",
    "/chimp-api/bogus",
];

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_missing_key_is_denied_on_every_route() {
    let app = demo_app();

    for route in ROUTES {
        let response = app.server.get(route).await;

        response.assert_status_ok();
        assert_eq!(response.text(), r#"{"error":"Access denied"}"#, "route {}", route);
        assert!(response.headers().get(chimp::server::COUNT_HEADER).is_none());
    }
}

#[tokio::test]
async fn test_wrong_key_is_denied_on_every_route() {
    let app = demo_app();

    for route in ROUTES {
        let response = app
            .server
            .get(route)
            .add_query_param("api_key", "not-the-key")
            .await;

        assert_eq!(response.json::<Value>(), json!({"error": "Access denied"}));
    }
}

#[tokio::test]
async fn test_empty_key_is_denied() {
    let app = demo_app();

    let response = app
        .server
        .get("/chimp-api/posts")
        .add_query_param("api_key", "")
        .await;

    assert_eq!(response.json::<Value>(), json!({"error": "Access denied"}));
}

#[tokio::test]
async fn test_repeated_key_parameter_uses_last_value() {
    let app = demo_app();

    let response = app
        .server
        .get("/chimp-api/posts?api_key=a&api_key=b")
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), r#"{"error":"Access denied"}"#);

    let response = app
        .server
        .get(&format!("/chimp-api/posts?api_key=wrong&api_key={}", app.key))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rotated_out_key_is_denied() {
    let mut app = demo_app();
    let first = app.credentials.rotate().unwrap().to_string();
    let second = app.credentials.rotate().unwrap().to_string();

    let response = app
        .server
        .get("/chimp-api/posts")
        .add_query_param("api_key", &first)
        .await;
    assert_eq!(response.json::<Value>(), json!({"error": "Access denied"}));

    app.key = second;
    let response = app.get("/chimp-api/posts").await;
    assert!(response.json::<Value>().is_array());
}

#[tokio::test]
async fn test_deactivated_api_denies_everything() {
    let app = demo_app();
    deactivate(app.credentials.as_ref()).unwrap();

    let response = app.get("/chimp-api/posts").await;
    assert_eq!(response.json::<Value>(), json!({"error": "Access denied"}));
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_unknown_route_is_plain_text() {
    let app = demo_app();

    let response = app.get("/chimp-api/bogus").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "Not provided.");
    assert!(
        response
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let app = demo_app();

    let response = app.get("/chimp-api/posts/").await;
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 2);

    let response = app.get("/chimp-api/posts/extra").await;
    assert_eq!(response.text(), "Not provided.");
}

#[tokio::test]
async fn test_index_descriptor() {
    let app = demo_app();

    for path in ["/chimp-api", "/chimp-api/"] {
        let response = app.get(path).await;
        let body: Value = response.json();

        assert_eq!(body["url"], "https://blog.example.com");
        assert_eq!(body["self"], "https://blog.example.com/chimp-api/");
        assert_eq!(body["version"], "6.5.2");
        assert_eq!(body["charset"], "UTF-8");
        assert_eq!(body["rss2_url"], "https://blog.example.com/feed/");
        assert_eq!(body["chimp_plugin_version"], env!("CARGO_PKG_VERSION"));
        assert!(response.headers().get(chimp::server::COUNT_HEADER).is_none());
    }
}

#[tokio::test]
async fn test_custom_api_path() {
    let mut config = demo_config();
    config.api_path = "/export/".to_string();
    let app = common::app_with(config, common::demo_host());

    let response = app.get("/export/users").await;
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 2);

    let response = app.get("/chimp-api/users").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_posts_page() {
    let app = demo_app();

    let response = app.get("/chimp-api/posts").await;

    response.assert_status_ok();
    assert_eq!(response.header("x-chimp-count"), "2");
    assert_eq!(response.header("x-chimp-pages"), "1");

    let posts: Vec<Value> = response.json();
    let ids: Vec<u64> = posts.iter().map(|p| p["ID"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![10, 11]);

    for post in &posts {
        for key in ["ID", "title", "author", "categories", "post_image", "tags"] {
            assert!(post.get(key).is_some(), "missing {}", key);
        }
    }

    let hello = &posts[0];
    assert_eq!(hello["title"], "Hello world");
    assert_eq!(hello["type"], "post");
    assert_eq!(hello["date"], "2024-01-15 09:30:00");
    assert_eq!(hello["link"], "https://blog.example.com/hello-world/");
    assert_eq!(hello["author"]["ID"], 1);
    assert_eq!(hello["author"]["twitter"], "@ada");
    assert_eq!(hello["categories"][0]["slug"], "news");
    assert_eq!(hello["tags"][0]["name"], "intro");
    assert_eq!(hello["post_image"]["ID"], 30);
    assert_eq!(hello["keyword"], "first post");
    assert_eq!(hello["meta_title"], "Hello world | Blog");
    assert_eq!(hello["meta_description"], "The very first post.");
    assert!(hello.get("social_image_url").is_none());

    let about = &posts[1];
    assert_eq!(about["type"], "page");
    assert!(about["post_image"].is_null());
    assert_eq!(about["meta_title"], "About us");
    assert!(about.get("keyword").is_none());
}

#[tokio::test]
async fn test_page_coercion() {
    let app = demo_app();

    for page in ["0", "-3", "abc", ""] {
        let response = app.get("/chimp-api/posts").add_query_param("page", page).await;
        let posts: Vec<Value> = response.json();
        assert_eq!(posts.len(), 2, "page {:?}", page);
    }

    let response = app
        .server
        .get(&format!("/chimp-api/posts?api_key={}&page=1&page=2", app.key))
        .await;
    response.assert_status_ok();
    let posts: Vec<Value> = response.json();
    assert!(posts.is_empty());

    let response = app.get("/chimp-api/posts").add_query_param("page", "2").await;
    let posts: Vec<Value> = response.json();
    assert!(posts.is_empty());
    assert_eq!(response.header("x-chimp-count"), "2");
}

// ============================================================================
// Users, comments, media
// ============================================================================

#[tokio::test]
async fn test_users_page() {
    let app = demo_app();

    let response = app.get("/chimp-api/users").await;
    assert_eq!(response.header("x-chimp-count"), "2");

    let users: Vec<Value> = response.json();
    assert_eq!(users[0]["login"], "editor");
    assert_eq!(users[0]["twitter"], "@ada");
    assert_eq!(users[1]["roles"], "author, contributor");
    assert!(users[1].get("twitter").is_none());
}

#[tokio::test]
async fn test_comments_total_beyond_last_page() {
    let app = demo_app();

    let response = app.get("/chimp-api/comments").add_query_param("page", "7").await;

    let comments: Vec<Value> = response.json();
    assert!(comments.is_empty());
    assert_eq!(response.header("x-chimp-count"), "2");
    assert_eq!(response.header("x-chimp-pages"), "1");
}

#[tokio::test]
async fn test_comments_page() {
    let app = demo_app();

    let comments: Vec<Value> = app.get("/chimp-api/comments").await.json();

    assert_eq!(comments[0]["ID"], 100);
    assert!(comments[0]["user_id"].is_null());
    assert_eq!(comments[1]["parent"], 100);
    assert_eq!(comments[1]["user_id"], 1);
}

#[tokio::test]
async fn test_media_page() {
    let app = demo_app();

    let response = app.get("/chimp-api/media").await;
    assert_eq!(response.header("x-chimp-count"), "1");

    let media: Vec<Value> = response.json();
    let cover = &media[0];
    assert_eq!(cover["mime_type"], "image/jpeg");
    assert_eq!(
        cover["source"],
        "https://blog.example.com/wp-content/uploads/2024/01/cover.jpg"
    );
    assert_eq!(
        cover["meta"]["sizes"]["thumbnail"]["url"],
        "https://blog.example.com/wp-content/uploads/2024/01/cover-150x150.jpg"
    );
    assert_eq!(cover["author"]["login"], "editor");
}
