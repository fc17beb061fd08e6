//! Project model. Only the like counter is read by the stats sync.

use serde::{Deserialize, Serialize};

/// A published project owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    pub title: String,
    /// Like counter, maintained by the like-toggle endpoint
    #[serde(default)]
    pub likes: i64,
}
