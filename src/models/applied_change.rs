use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully applied suggestion. Entries are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedChange {
    pub suggestion_id: String,
    pub section: String,
    pub text: String,
    pub applied_at: DateTime<Utc>,
}

impl AppliedChange {
    /// First `max_chars` characters of the applied text, for list views.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => &self.text[..byte_index],
            None => &self.text,
        }
    }
}
