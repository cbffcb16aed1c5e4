// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie handling and the login/admin gates.

use crate::error::AppError;
use crate::models::{Role, User};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "agency_session";

/// Session lifetime. Sessions are not refreshed.
pub const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (normalised email)
    pub sub: String,
    pub name: String,
    /// Role at login time; display only
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub picture: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Identity snapshot for the current visitor.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub picture: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            name: claims.name,
            role: claims.role,
            picture: claims.picture,
        }
    }
}

/// Create a signed session token for a user.
pub fn create_session_token(user: &User, signing_key: &[u8]) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        picture: user.picture.clone(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Decode and verify a session token. Expired or tampered tokens yield `None`.
pub fn decode_session_token(token: &str, signing_key: &[u8]) -> Option<Session> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims.into())
        .map_err(|e| tracing::debug!(error = %e, "Rejected session token"))
        .ok()
}

/// Session carried by the request's cookie, if any.
pub fn current_session(jar: &CookieJar, signing_key: &[u8]) -> Option<Session> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| decode_session_token(cookie.value(), signing_key))
}

/// Whether the request reached us over plain HTTP on a development host.
pub fn is_local_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| host.starts_with("localhost") || host.starts_with("127.0.0.1"))
        .unwrap_or(true)
}

/// Cookie carrying a fresh session token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

/// Cookie that clears the session. Attributes match [`session_cookie`].
pub fn session_removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Pages: visitors without a session are redirected to the login form.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session =
        current_session(&jar, &state.config.session_secret).ok_or(AppError::LoginRequired)?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Form posts and AI tools: visitors without a session get a bare 401.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session =
        current_session(&jar, &state.config.session_secret).ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Admin routes. The stored user record decides, not the session snapshot.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let mut session =
        current_session(&jar, &state.config.session_secret).ok_or(AppError::LoginRequired)?;

    match state.db.get_user(&session.email).await? {
        Some(user) if user.is_admin() => {
            session.role = user.role;
        }
        _ => {
            tracing::warn!(email = %session.email, path = %request.uri().path(), "Admin access denied");
            return Err(AppError::Forbidden);
        }
    }

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
