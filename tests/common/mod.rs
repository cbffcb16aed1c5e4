// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use ai_agency::config::Config;
use ai_agency::db::Database;
use ai_agency::middleware::auth::{create_session_token, SESSION_COOKIE};
use ai_agency::models::{Role, User};
use ai_agency::routes::create_router;
use ai_agency::services::{password, CompletionClient, GoogleOAuthClient, Mailer};
use ai_agency::time_utils::now_rfc3339;
use ai_agency::views::Views;
use ai_agency::AppState;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use std::sync::Arc;

pub const TEST_PASSWORD: &str = "password123";

/// Check if emulator is available via environment variable.
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test app backed by a fresh in-memory store.
/// Returns the router and the shared state.
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), None)
}

/// Create a test app with a custom config and optional Google client.
pub fn create_test_app_with(
    config: Config,
    google: Option<GoogleOAuthClient>,
) -> (axum::Router, Arc<AppState>) {
    build_test_app(config, google, Mailer::disabled())
}

/// Create a test app that sends alert mails through `mailer`.
pub fn create_test_app_with_mailer(mailer: Mailer) -> (axum::Router, Arc<AppState>) {
    build_test_app(Config::test_default(), None, mailer)
}

fn build_test_app(
    config: Config,
    google: Option<GoogleOAuthClient>,
    mailer: Mailer,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        ai: CompletionClient::new(&config),
        db: Database::memory(),
        views: Views::new().expect("templates should compile"),
        mailer,
        google,
        config,
    });

    (create_router(state.clone()), state)
}

/// Insert a user with [`TEST_PASSWORD`] directly into the store.
pub async fn seed_user(state: &AppState, email: &str, name: &str, role: Role) -> User {
    let user = User {
        email: email.to_string(),
        name: name.to_string(),
        password_hash: Some(password::hash_password(TEST_PASSWORD).unwrap()),
        google_id: None,
        picture: None,
        role,
        created_at: now_rfc3339(),
        last_login: None,
    };
    state.db.create_user(&user).await.unwrap();
    user
}

/// `Cookie` header value carrying a valid session for `user`.
pub fn session_cookie_for(state: &AppState, user: &User) -> String {
    let token = create_session_token(user, &state.config.session_secret).unwrap();
    format!("{}={}", SESSION_COOKIE, token)
}

/// GET request, optionally with a `Cookie` header.
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Form POST, optionally with a `Cookie` header.
pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// The `name=value` pair of a Set-Cookie header, suitable for a `Cookie` header.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}
