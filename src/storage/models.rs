use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub category_id: String,
    pub quantity: u32,
    /// Object store key of the PDF, in the `pdfs` namespace
    #[serde(default)]
    pub file_path: Option<String>,
    /// Object store key of the cover image, in the `covers` namespace
    #[serde(default)]
    pub cover_path: Option<String>,
    /// Principal that created the record. Set once, never updated.
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable book fields for an update. Text fields and quantity are always
/// overwritten; `file_path`/`cover_path` are `None` to keep the stored key.
/// `owner_id` is deliberately absent.
#[derive(Debug, Clone)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category_id: String,
    pub quantity: u32,
    pub file_path: Option<String>,
    pub cover_path: Option<String>,
}

/// A category record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
