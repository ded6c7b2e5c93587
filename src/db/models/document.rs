use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Document;

/// Most recently persisted state of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: String,
    pub revision: i64,
    pub document: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
