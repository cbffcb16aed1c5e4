//! Review (testimonial) model.

use serde::{Deserialize, Serialize};

/// Stored review shown on the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Document ID
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    /// Star rating, 1 to 5
    pub rating: i32,
    pub comment: String,
    pub created_at: String,
}
