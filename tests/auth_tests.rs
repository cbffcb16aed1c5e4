// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and logout tests against the full router.

use ai_agency::middleware::auth::SESSION_COOKIE;
use ai_agency::models::Role;
use ai_agency::services::password::verify_password;
use axum::http::StatusCode;
use tower::ServiceExt;

mod common;
use common::{
    body_string, cookie_pair, find_cookie, get, location, post_form, seed_user,
    set_cookie_headers, TEST_PASSWORD,
};

#[tokio::test]
async fn test_signup_creates_user_and_redirects_to_login() {
    let (app, state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(post_form(
            "/signup",
            "name=Jane+Doe&email=Jane%40Example.com&password=hunter22",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let user = state.db.get_user("jane@example.com").await.unwrap().unwrap();
    assert_eq!(user.name, "Jane Doe");
    assert_eq!(user.role, Role::User);
    assert!(verify_password("hunter22", user.password_hash.as_deref().unwrap()));

    // Flash message shows on the login page, once.
    let flash = find_cookie(&set_cookie_headers(&response), "flash").unwrap();
    let response = app
        .clone()
        .oneshot(get("/login", Some(&cookie_pair(&flash))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Account created! Please log in."));
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let (app, state) = common::create_test_app();

    let first = app
        .clone()
        .oneshot(post_form(
            "/signup",
            "name=First&email=dup%40example.com&password=first-pass",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(location(&first), "/login");

    let second = app
        .clone()
        .oneshot(post_form(
            "/signup",
            "name=Second&email=DUP%40example.com&password=second-pass",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&second), "/signup");

    // The first account is untouched.
    let user = state.db.get_user("dup@example.com").await.unwrap().unwrap();
    assert_eq!(user.name, "First");
    assert!(verify_password("first-pass", user.password_hash.as_deref().unwrap()));
    assert_eq!(state.db.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_signup_with_admin_email_grants_admin() {
    let (app, state) = common::create_test_app();
    let admin_email = state.config.admin_email.clone();

    app.oneshot(post_form(
        "/signup",
        &format!(
            "name=Boss&email={}&password=pw",
            urlencoding::encode(&admin_email)
        ),
        None,
    ))
    .await
    .unwrap();

    let user = state.db.get_user(&admin_email).await.unwrap().unwrap();
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(post_form("/signup", "name=X&email=not-an-email&password=pw", None))
        .await
        .unwrap();

    assert_eq!(location(&response), "/signup");
    assert!(state.db.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_success_sets_session() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "jane@example.com", "Jane", Role::User).await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/login",
            &format!("email=jane%40example.com&password={}", TEST_PASSWORD),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let cookies = set_cookie_headers(&response);
    let session = find_cookie(&cookies, SESSION_COOKIE).expect("session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Path=/"));

    let user = state.db.get_user("jane@example.com").await.unwrap().unwrap();
    assert!(user.last_login.is_some());

    // The cookie opens the dashboard.
    let response = app
        .oneshot(get("/dashboard", Some(&cookie_pair(&session))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Welcome Jane!"));
}

#[tokio::test]
async fn test_login_wrong_password_sets_no_session() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "jane@example.com", "Jane", Role::User).await;

    let response = app
        .oneshot(post_form(
            "/login",
            "email=jane%40example.com&password=wrong",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let cookies = set_cookie_headers(&response);
    assert!(find_cookie(&cookies, SESSION_COOKIE).is_none());
    assert!(find_cookie(&cookies, "flash").is_some());

    let user = state.db.get_user("jane@example.com").await.unwrap().unwrap();
    assert!(user.last_login.is_none());
}

#[tokio::test]
async fn test_login_unknown_user_sets_no_session() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(post_form(
            "/login",
            "email=ghost%40example.com&password=whatever",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(location(&response), "/login");
    assert!(find_cookie(&set_cookie_headers(&response), SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn test_google_only_account_cannot_password_login() {
    let (app, state) = common::create_test_app();
    let mut user = seed_user(&state, "g@example.com", "G", Role::User).await;
    user.password_hash = None;
    state.db.upsert_user(&user).await.unwrap();

    let response = app
        .oneshot(post_form("/login", "email=g%40example.com&password=", None))
        .await
        .unwrap();

    assert_eq!(location(&response), "/login");
    assert!(find_cookie(&set_cookie_headers(&response), SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let (app, state) = common::create_test_app();
    let user = seed_user(&state, "jane@example.com", "Jane", Role::User).await;
    let cookie = common::session_cookie_for(&state, &user);

    let response = app
        .oneshot(get("/logout", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let removal = find_cookie(&set_cookie_headers(&response), SESSION_COOKIE).unwrap();
    assert!(removal.starts_with(&format!("{SESSION_COOKIE}=;")));
    assert!(removal.contains("Max-Age=0"));
    assert!(removal.contains("Path=/"));
    assert!(removal.contains("HttpOnly"));
    assert!(!removal.contains("Secure"));
}

#[tokio::test]
async fn test_production_host_gets_secure_cookie() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "jane@example.com", "Jane", Role::User).await;

    let mut request = post_form(
        "/login",
        &format!("email=jane%40example.com&password={}", TEST_PASSWORD),
        None,
    );
    request
        .headers_mut()
        .insert("host", "agency.example.com".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    let session = find_cookie(&set_cookie_headers(&response), SESSION_COOKIE).unwrap();
    assert!(session.contains("Secure"));
}
