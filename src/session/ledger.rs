use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::AppliedChange;

/// Append-only record of applied suggestions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AppliedChangeLedger {
    entries: Vec<AppliedChange>,
}

impl AppliedChangeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        suggestion_id: impl Into<String>,
        section: impl Into<String>,
        text: impl Into<String>,
        applied_at: DateTime<Utc>,
    ) {
        self.entries.push(AppliedChange {
            suggestion_id: suggestion_id.into(),
            section: section.into(),
            text: text.into(),
            applied_at,
        });
    }

    pub fn entries(&self) -> &[AppliedChange] {
        &self.entries
    }

    pub fn contains(&self, suggestion_id: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.suggestion_id == suggestion_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_append_in_order() {
        let mut ledger = AppliedChangeLedger::new();
        let now = Utc::now();
        ledger.record("2", "skills", "Docker", now);
        ledger.record("1", "Summary", "Built 3 apps.", now);

        let ids: Vec<&str> = ledger
            .entries()
            .iter()
            .map(|entry| entry.suggestion_id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(ledger.entries()[1].section, "Summary");
        assert!(ledger.contains("1"));
        assert!(!ledger.contains("3"));
    }
}
