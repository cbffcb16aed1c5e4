// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth 2.0 client for "Sign in with Google".
//!
//! Handles:
//! - Building the authorization redirect
//! - Exchanging the authorization code for an access token
//! - Fetching the signed-in user's profile

use crate::config::GoogleOAuthConfig;
use crate::error::AppError;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";
const SCOPES: &str = "openid email profile";

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    /// Create a new client with OAuth credentials.
    pub fn new(config: &GoogleOAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: TOKEN_URL.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
        }
    }

    /// Point the token and userinfo calls at another host (tests).
    pub fn with_endpoints(mut self, token_url: &str, userinfo_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self.userinfo_url = userinfo_url.to_string();
        self
    }

    /// URL of Google's consent screen for this app.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Complete the sign-in: exchange the code, then fetch the profile.
    pub async fn complete_sign_in(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleProfile, AppError> {
        let token = self.exchange_code(code, redirect_uri).await?;
        self.get_profile(&token.access_token).await
    }

    /// Exchange authorization code for an access token.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Google token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Google token exchange failed");
            return Err(AppError::Upstream(format!(
                "Google token exchange failed with status {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            AppError::Upstream(format!("Failed to parse Google token response: {}", e))
        })
    }

    /// Get the authenticated user's profile.
    async fn get_profile(&self, access_token: &str) -> Result<GoogleProfile, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Google userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!(
                "Google userinfo failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse Google profile: {}", e)))
    }
}

/// Token response from Google's token endpoint.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Profile returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub email: String,
    /// Absent means Google has not confirmed the address.
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> GoogleOAuthClient {
        GoogleOAuthClient::new(&GoogleOAuthConfig {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
        })
    }

    #[test]
    fn test_authorize_url_encodes_parameters() {
        let url = client().authorize_url("http://localhost:5000/authorize", "abc");
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=cid"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5000%2Fauthorize"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=abc"));
    }

    #[tokio::test]
    async fn test_complete_sign_in() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=the-code"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "tok" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "g-1",
                "email": "jane@example.com",
                "verified_email": true,
                "name": "Jane",
                "picture": "https://example.com/jane.png"
            })))
            .mount(&server)
            .await;

        let client = client().with_endpoints(
            &format!("{}/token", server.uri()),
            &format!("{}/userinfo", server.uri()),
        );

        let profile = client
            .complete_sign_in("the-code", "http://localhost/authorize")
            .await
            .unwrap();
        assert_eq!(profile.id, "g-1");
        assert_eq!(profile.email, "jane@example.com");
        assert!(profile.verified_email);
        assert_eq!(profile.picture.as_deref(), Some("https://example.com/jane.png"));
    }

    #[tokio::test]
    async fn test_token_exchange_failure_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let client = client().with_endpoints(
            &format!("{}/token", server.uri()),
            &format!("{}/userinfo", server.uri()),
        );

        let err = client
            .complete_sign_in("bad", "http://localhost/authorize")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
