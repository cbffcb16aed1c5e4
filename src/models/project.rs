//! Portfolio project model.

use serde::{Deserialize, Serialize};

/// Project shown in the public portfolio. Managed by admins only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Document ID
    pub id: String,
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub description: String,
    pub created_at: String,
}
