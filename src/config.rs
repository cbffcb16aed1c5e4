//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup. For local development a `.env` file
//! in the working directory is honoured.

use std::env;

/// Which document store backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// Process-local collections, lost on restart.
    Memory,
    /// Google Cloud Firestore (requires the `firestore` feature).
    Firestore,
}

/// Credentials for Google sign-in.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// SMTP relay settings for alert mails.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Sender address
    pub from: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Key for session JWTs and OAuth state signatures (raw bytes)
    pub session_secret: Vec<u8>,
    /// Email address that is granted the admin role
    pub admin_email: String,
    pub database_backend: DatabaseBackend,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,
    /// Google sign-in; `None` disables the OAuth routes
    pub google_oauth: Option<GoogleOAuthConfig>,
    /// Completion API bearer key
    pub ai_api_key: Option<String>,
    /// Completion API base URL (without `/chat/completions`)
    pub ai_api_url: String,
    pub ai_model: String,
    /// Mail relay; `None` disables alert mails
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let database_backend = match env::var("DATABASE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => DatabaseBackend::Memory,
            "firestore" => DatabaseBackend::Firestore,
            _ => return Err(ConfigError::Invalid("DATABASE_BACKEND")),
        };

        let google_oauth = match (
            non_empty_var("GOOGLE_CLIENT_ID"),
            non_empty_var("GOOGLE_CLIENT_SECRET"),
        ) {
            (Some(client_id), Some(client_secret)) => Some(GoogleOAuthConfig {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let smtp = non_empty_var("SMTP_HOST").map(|host| {
            let username = env::var("SMTP_USERNAME").unwrap_or_default();
            SmtpConfig {
                host,
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from: non_empty_var("MAIL_FROM").unwrap_or_else(|| username.clone()),
                username,
            }
        });

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            session_secret: env::var("SESSION_SECRET")
                .map_err(|_| ConfigError::Missing("SESSION_SECRET"))?
                .into_bytes(),
            admin_email: env::var("ADMIN_EMAIL")
                .map(|v| v.trim().to_ascii_lowercase())
                .map_err(|_| ConfigError::Missing("ADMIN_EMAIL"))?,
            database_backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            google_oauth,
            ai_api_key: non_empty_var("AI_API_KEY"),
            ai_api_url: env::var("AI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            smtp,
        })
    }

    /// Deterministic config for tests: in-memory store, no external services.
    pub fn test_default() -> Self {
        Self {
            port: 5000,
            session_secret: b"test_session_secret_32_bytes!!!!".to_vec(),
            admin_email: "admin@agency.test".to_string(),
            database_backend: DatabaseBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            google_oauth: None,
            ai_api_key: Some("test_ai_key".to_string()),
            ai_api_url: "http://127.0.0.1:9".to_string(),
            ai_model: "test-model".to_string(),
            smtp: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
