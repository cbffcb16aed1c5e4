//! User model for storage and sessions.

use serde::{Deserialize, Serialize};

/// Authorization role persisted on the user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Role granted to a new or returning account.
    ///
    /// The configured admin email is always promoted; anyone else keeps
    /// whatever role they already had.
    pub fn for_email(email: &str, admin_email: &str, existing: Option<Role>) -> Role {
        if email == admin_email {
            Role::Admin
        } else {
            existing.unwrap_or_default()
        }
    }
}

/// User profile stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Normalised email address (also used as document ID)
    pub email: String,
    /// Display name
    pub name: String,
    /// Argon2 PHC string; `None` for accounts created through Google sign-in
    #[serde(default)]
    pub password_hash: Option<String>,
    /// Google account ID, once the user has signed in with Google
    #[serde(default)]
    pub google_id: Option<String>,
    /// Profile picture URL
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// When the account was created
    pub created_at: String,
    /// Last successful login
    #[serde(default)]
    pub last_login: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Canonical form of an email address used as the user key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
