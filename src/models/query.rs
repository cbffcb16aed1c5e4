// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Customer query (contact form submission) model.

use serde::{Deserialize, Serialize};

/// Processing state of a query. Only an admin changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    #[default]
    Pending,
    Completed,
}

impl QueryStatus {
    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            QueryStatus::Pending => QueryStatus::Completed,
            QueryStatus::Completed => QueryStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryStatus::Pending => "Pending",
            QueryStatus::Completed => "Completed",
        }
    }
}

/// Stored query record. Requester fields are copied from the session at
/// submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Document ID
    pub id: String,
    pub user_email: String,
    pub user_name: String,
    /// Requested service (free text from the form)
    pub service_type: String,
    pub message: String,
    pub status: QueryStatus,
    pub created_at: String,
}
