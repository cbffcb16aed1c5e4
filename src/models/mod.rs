// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod project;
pub mod query;
pub mod review;
pub mod user;

pub use project::Project;
pub use query::{Query, QueryStatus};
pub use review::Review;
pub use user::{Role, User};

/// Generate a fresh document ID.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
