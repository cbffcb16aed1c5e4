// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI tool endpoint tests against a mock completion API.

use ai_agency::config::Config;
use ai_agency::models::Role;
use ai_agency::AppState;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{bearer_token, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{body_string, post_form, seed_user, session_cookie_for};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

async fn app_with_mock(server: &MockServer) -> (axum::Router, std::sync::Arc<AppState>, String) {
    let config = Config {
        ai_api_url: server.uri(),
        ..Config::test_default()
    };
    let (app, state) = common::create_test_app_with(config, None);
    let user = seed_user(&state, "jane@example.com", "Jane", Role::User).await;
    let cookie = session_cookie_for(&state, &user);
    (app, state, cookie)
}

#[tokio::test]
async fn test_youtube_titles_and_tags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("test_ai_key"))
        .and(body_string_contains("home espresso"))
        .and(body_string_contains("\"temperature\":0.7"))
        .respond_with(completion(
            "Titles:\n- Espresso at Home\n- Barista Secrets\nTags:\ncoffee, espresso",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _, cookie) = app_with_mock(&server).await;
    let response = app
        .oneshot(post_form("/api/youtube-gen", "topic=home+espresso", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<li>Espresso at Home</li>"));
    assert!(body.contains("<li>Barista Secrets</li>"));
    assert!(body.contains("coffee, espresso"));
}

#[tokio::test]
async fn test_instagram_reply_without_hashtags_uses_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("Captions:\n- Sunset mood\n- Golden hour"))
        .mount(&server)
        .await;

    let (app, _, cookie) = app_with_mock(&server).await;
    let response = app
        .oneshot(post_form(
            "/api/insta-gen",
            "description=beach+at+sunset",
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<li>Sunset mood</li>"));
    assert!(body.contains("#NoTags"));
}

#[tokio::test]
async fn test_unparseable_reply_is_shown_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("Titles:\nTags: none"))
        .mount(&server)
        .await;

    let (app, _, cookie) = app_with_mock(&server).await;
    let response = app
        .oneshot(post_form("/api/youtube-gen", "topic=rust", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<pre>Titles:\nTags: none</pre>"));
}

#[tokio::test]
async fn test_upstream_failure_hides_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key sk-secret"))
        .mount(&server)
        .await;

    let (app, _, cookie) = app_with_mock(&server).await;
    let response = app
        .oneshot(post_form("/api/youtube-gen", "topic=rust", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_string(response).await;
    assert!(!body.contains("sk-secret"));
    assert!(body.contains("temporarily unavailable"));
}

#[tokio::test]
async fn test_blank_input_is_rejected_without_calling_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("- x"))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _, cookie) = app_with_mock(&server).await;
    let response = app
        .oneshot(post_form("/api/insta-gen", "description=+++", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ai_tools_require_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("- x"))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _, _) = app_with_mock(&server).await;
    let response = app
        .oneshot(post_form("/api/youtube-gen", "topic=rust", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_api_key_is_upstream_error() {
    let server = MockServer::start().await;
    let config = Config {
        ai_api_url: server.uri(),
        ai_api_key: None,
        ..Config::test_default()
    };
    let (app, state) = common::create_test_app_with(config, None);
    let user = seed_user(&state, "jane@example.com", "Jane", Role::User).await;

    let response = app
        .oneshot(post_form(
            "/api/youtube-gen",
            "topic=rust",
            Some(&session_cookie_for(&state, &user)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
