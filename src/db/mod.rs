//! Database layer.
//!
//! `Database` fronts one of two document stores with identical operations:
//! an in-process store (default) and Firestore (`firestore` feature).

#[cfg(feature = "firestore")]
pub mod firestore;
pub mod memory;

#[cfg(feature = "firestore")]
pub use self::firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::config::{Config, DatabaseBackend};
use crate::error::AppError;
use crate::models::{Project, Query, Review, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const QUERIES: &str = "queries";
    pub const REVIEWS: &str = "reviews";
    pub const PROJECTS: &str = "projects";
}

/// Number of reviews shown on the home page.
pub const HOME_REVIEW_LIMIT: u32 = 6;

/// Handle to the configured document store. Cheap to clone.
#[derive(Clone)]
pub enum Database {
    Memory(MemoryStore),
    #[cfg(feature = "firestore")]
    Firestore(FirestoreStore),
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            Database::Memory($store) => $call,
            #[cfg(feature = "firestore")]
            Database::Firestore($store) => $call,
        }
    };
}

impl Database {
    /// Connect to the backend selected in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.database_backend {
            DatabaseBackend::Memory => {
                tracing::warn!("Using in-memory store; data will not survive a restart");
                Ok(Self::memory())
            }
            #[cfg(feature = "firestore")]
            DatabaseBackend::Firestore => Ok(Database::Firestore(
                FirestoreStore::new(&config.gcp_project_id).await?,
            )),
            #[cfg(not(feature = "firestore"))]
            DatabaseBackend::Firestore => Err(AppError::Database(
                "Firestore backend requested but built without the `firestore` feature"
                    .to_string(),
            )),
        }
    }

    /// A fresh, empty in-memory store.
    pub fn memory() -> Self {
        Database::Memory(MemoryStore::default())
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Get a user by normalised email.
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, store => store.get_user(email).await)
    }

    /// Insert a new user. Fails with `AppError::Conflict` if the email is
    /// already registered; the existing document is left untouched.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self, store => store.create_user(user).await)
    }

    /// Create or replace a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self, store => store.upsert_user(user).await)
    }

    /// Set `last_login` on an existing user; other fields are left alone.
    pub async fn record_login(&self, email: &str, at: &str) -> Result<(), AppError> {
        dispatch!(self, store => store.record_login(email, at).await)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        dispatch!(self, store => store.list_users().await)
    }

    // ─── Queries ─────────────────────────────────────────────────

    pub async fn insert_query(&self, query: &Query) -> Result<(), AppError> {
        dispatch!(self, store => store.insert_query(query).await)
    }

    pub async fn get_query(&self, id: &str) -> Result<Option<Query>, AppError> {
        dispatch!(self, store => store.get_query(id).await)
    }

    /// Overwrite an existing query document.
    pub async fn update_query(&self, query: &Query) -> Result<(), AppError> {
        dispatch!(self, store => store.update_query(query).await)
    }

    /// All queries, newest first.
    pub async fn list_queries(&self) -> Result<Vec<Query>, AppError> {
        dispatch!(self, store => store.list_queries().await)
    }

    /// Queries submitted by one user, newest first.
    pub async fn list_queries_for_user(&self, email: &str) -> Result<Vec<Query>, AppError> {
        dispatch!(self, store => store.list_queries_for_user(email).await)
    }

    // ─── Reviews ─────────────────────────────────────────────────

    pub async fn insert_review(&self, review: &Review) -> Result<(), AppError> {
        dispatch!(self, store => store.insert_review(review).await)
    }

    /// Reviews, newest first, optionally capped.
    pub async fn list_reviews(&self, limit: Option<u32>) -> Result<Vec<Review>, AppError> {
        dispatch!(self, store => store.list_reviews(limit).await)
    }

    /// Delete a review. Unknown IDs are ignored.
    pub async fn delete_review(&self, id: &str) -> Result<(), AppError> {
        dispatch!(self, store => store.delete_review(id).await)
    }

    // ─── Projects ────────────────────────────────────────────────

    pub async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        dispatch!(self, store => store.insert_project(project).await)
    }

    /// All projects, newest first.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        dispatch!(self, store => store.list_projects().await)
    }

    /// Delete a project. Unknown IDs are ignored.
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        dispatch!(self, store => store.delete_project(id).await)
    }
}
