// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: password signup/login, Google sign-in, logout.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::flash;
use crate::middleware::auth::{
    create_session_token, current_session, is_local_request, session_cookie,
    session_removal_cookie,
};
use crate::models::user::normalize_email;
use crate::models::{Role, User};
use crate::services::google_oauth::GoogleProfile;
use crate::services::{mailer, password};
use crate::time_utils::now_rfc3339;
use crate::views::AuthPage;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// How long a Google sign-in may take from redirect to callback.
const OAUTH_STATE_MAX_AGE_MS: u128 = 10 * 60 * 1000;

const LOGIN_FAILED: &str = "Invalid email or password";
const GOOGLE_FAILED: &str = "Google sign-in failed. Please try again.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", get(logout))
        .route("/login/google", get(google_start))
        .route("/authorize", get(google_callback))
}

// ─── Password accounts ───────────────────────────────────────────

type Page = (CookieJar, Html<String>);

async fn login_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Page> {
    auth_page(&state, jar, "login.html")
}

async fn signup_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Page> {
    auth_page(&state, jar, "signup.html")
}

fn auth_page(state: &AppState, jar: CookieJar, template: &str) -> Result<Page> {
    let session = current_session(&jar, &state.config.session_secret);
    let (jar, flash) = flash::take(jar);
    let page = AuthPage {
        session,
        flash,
        google_enabled: state.google.is_some(),
    };
    Ok((jar, state.views.render(template, &page)?))
}

#[derive(Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    password: String,
}

/// First message of the first failed field.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check the form and try again".to_string())
}

async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(mut form): Form<SignupForm>,
) -> Result<(CookieJar, Redirect)> {
    form.name = form.name.trim().to_string();
    form.email = normalize_email(&form.email);

    if let Err(errors) = form.validate() {
        let message = first_validation_message(&errors);
        return Ok((flash::set(jar, &message), Redirect::to("/signup")));
    }

    let user = User {
        role: Role::for_email(&form.email, &state.config.admin_email, None),
        email: form.email,
        name: form.name,
        password_hash: Some(password::hash_password(&form.password)?),
        google_id: None,
        picture: None,
        created_at: now_rfc3339(),
        last_login: None,
    };

    match state.db.create_user(&user).await {
        Ok(()) => {}
        Err(AppError::Conflict(_)) => {
            tracing::info!(email = %user.email, "Signup rejected, email already registered");
            return Ok((
                flash::set(jar, "Email already registered. Please log in."),
                Redirect::to("/signup"),
            ));
        }
        Err(e) => return Err(e),
    }

    tracing::info!(email = %user.email, role = ?user.role, "User registered");

    let (subject, body) = mailer::signup_alert(&user.name, &user.email);
    state
        .mailer
        .notify(&state.config.admin_email, &subject, &body)
        .await;

    Ok((
        flash::set(jar, "Account created! Please log in."),
        Redirect::to("/login"),
    ))
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect)> {
    let email = normalize_email(&form.email);

    let user = state.db.get_user(&email).await?.filter(|user| {
        user.password_hash
            .as_deref()
            .is_some_and(|hash| password::verify_password(&form.password, hash))
    });

    let Some(mut user) = user else {
        tracing::info!(email = %email, "Failed login attempt");
        return Ok((flash::set(jar, LOGIN_FAILED), Redirect::to("/login")));
    };

    let now = now_rfc3339();
    state.db.record_login(&user.email, &now).await?;
    user.last_login = Some(now);

    let jar = start_session(jar, &state, &user, &headers)?;
    tracing::info!(email = %user.email, "User logged in");
    Ok((jar, Redirect::to("/dashboard")))
}

async fn logout(headers: HeaderMap, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.add(session_removal_cookie(!is_local_request(&headers)));
    (jar, Redirect::to("/"))
}

fn start_session(
    jar: CookieJar,
    state: &AppState,
    user: &User,
    headers: &HeaderMap,
) -> Result<CookieJar> {
    let token = create_session_token(user, &state.config.session_secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
    Ok(jar.add(session_cookie(token, !is_local_request(headers))))
}

// ─── Google sign-in ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleStartParams {
    /// Local path to land on after sign-in.
    #[serde(default)]
    next: Option<String>,
}

/// Start OAuth flow - redirect to Google's consent screen.
async fn google_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GoogleStartParams>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Google sign-in is not enabled".to_string()))?;

    let next = params
        .next
        .filter(|n| is_local_path(n))
        .unwrap_or_else(|| "/dashboard".to_string());

    let oauth_state = sign_oauth_state(&next, now_millis()?, &state.config.session_secret)?;
    let auth_url = google.authorize_url(&callback_url(&headers), &oauth_state);

    tracing::info!(next = %next, "Starting OAuth flow, redirecting to Google");

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code, upsert the user, create the session.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Google sign-in is not enabled".to_string()))?;

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        return Ok((flash::set(jar, GOOGLE_FAILED), Redirect::to("/login")));
    }

    let next = params
        .state
        .as_deref()
        .and_then(|s| verify_oauth_state(s, &state.config.session_secret, now_millis().ok()?));
    let (Some(next), Some(code)) = (next, params.code) else {
        tracing::warn!("Invalid, expired or tampered OAuth state");
        return Ok((flash::set(jar, GOOGLE_FAILED), Redirect::to("/login")));
    };

    let profile = google
        .complete_sign_in(&code, &callback_url(&headers))
        .await?;

    // Accounts are keyed by email, so an unconfirmed address must never
    // reach the lookup.
    if !profile.verified_email {
        tracing::warn!(email = %profile.email, google_id = %profile.id, "Google email not verified");
        return Ok((
            flash::set(jar, "Please verify your Google email address before signing in."),
            Redirect::to("/login"),
        ));
    }

    let user = upsert_google_user(&state, profile).await?;
    tracing::info!(email = %user.email, role = ?user.role, "Google sign-in successful");

    let jar = start_session(jar, &state, &user, &headers)?;
    Ok((jar, Redirect::to(&next)))
}

/// Create or refresh the account for a Google profile.
///
/// The account is keyed by email, so a password account and a Google
/// sign-in with the same address share one record.
async fn upsert_google_user(state: &AppState, profile: GoogleProfile) -> Result<User> {
    let email = normalize_email(&profile.email);
    if email.is_empty() {
        return Err(AppError::Upstream(
            "Google profile has no email address".to_string(),
        ));
    }

    let existing = state.db.get_user(&email).await?;
    let now = now_rfc3339();

    let user = match existing {
        Some(mut user) => {
            user.role = Role::for_email(&email, &state.config.admin_email, Some(user.role));
            if !profile.name.is_empty() {
                user.name = profile.name;
            }
            user.google_id = Some(profile.id);
            user.picture = profile.picture.or(user.picture);
            user.last_login = Some(now);
            user
        }
        None => User {
            role: Role::for_email(&email, &state.config.admin_email, None),
            name: if profile.name.is_empty() {
                email.clone()
            } else {
                profile.name
            },
            email,
            password_hash: None,
            google_id: Some(profile.id),
            picture: profile.picture,
            created_at: now.clone(),
            last_login: Some(now),
        },
    };

    state.db.upsert_user(&user).await?;
    Ok(user)
}

/// Absolute URL of the OAuth callback, derived from the request's Host.
fn callback_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:5000");

    let scheme = if is_local_request(headers) {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/authorize", scheme, host)
}

fn now_millis() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis())
}

/// Only same-site paths are accepted as post-login destinations.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') && !path.contains('|')
}

/// Build the OAuth `state`: "next|timestamp_hex|signature_hex", base64url.
fn sign_oauth_state(next: &str, timestamp_ms: u128, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", next, timestamp_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed_state = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify the HMAC signature and age of an OAuth state, returning the
/// post-login path it carries.
fn verify_oauth_state(state: &str, secret: &[u8], now_ms: u128) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    let [next, timestamp_hex, signature_hex] = parts[..] else {
        return None;
    };

    let signature = hex::decode(signature_hex).ok()?;
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(format!("{}|{}", next, timestamp_hex).as_bytes());
    if mac.verify_slice(&signature).is_err() {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued = u128::from_str_radix(timestamp_hex, 16).ok()?;
    if issued > now_ms || now_ms - issued > OAUTH_STATE_MAX_AGE_MS {
        tracing::warn!("OAuth state expired");
        return None;
    }

    is_local_path(next).then(|| next.to_string())
}
