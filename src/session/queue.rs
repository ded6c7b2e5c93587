use serde::Serialize;

use crate::models::Suggestion;

/// Pending suggestions in the order the analysis service issued them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SuggestionQueue {
    pending: Vec<Suggestion>,
}

impl SuggestionQueue {
    /// Build a queue, keeping only the first suggestion for each id.
    pub fn new(suggestions: impl IntoIterator<Item = Suggestion>) -> Self {
        let mut pending: Vec<Suggestion> = Vec::new();
        for suggestion in suggestions {
            if pending.iter().any(|existing| existing.id == suggestion.id) {
                log::warn!("Dropping duplicate suggestion id {}", suggestion.id);
                continue;
            }
            pending.push(suggestion);
        }
        Self { pending }
    }

    pub fn get(&self, id: &str) -> Option<&Suggestion> {
        self.pending.iter().find(|suggestion| suggestion.id == id)
    }

    /// Remove and return the suggestion with `id`. A consumed id yields `None`.
    pub fn take(&mut self, id: &str) -> Option<Suggestion> {
        let index = self.pending.iter().position(|suggestion| suggestion.id == id)?;
        Some(self.pending.remove(index))
    }

    /// Copy of everything pending right now, in original order.
    pub fn snapshot(&self) -> Vec<Suggestion> {
        self.pending.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suggestion> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_removes_exactly_once() {
        let mut queue = SuggestionQueue::new(vec![
            Suggestion::addition("1", "skills", "Rust"),
            Suggestion::addition("2", "skills", "SQL"),
        ]);

        assert_eq!(queue.take("1").map(|s| s.suggested), Some("Rust".to_string()));
        assert!(queue.take("1").is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let queue = SuggestionQueue::new(vec![
            Suggestion::addition("1", "skills", "Rust"),
            Suggestion::addition("1", "skills", "Go"),
        ]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get("1").map(|s| s.suggested.as_str()), Some("Rust"));
    }

    #[test]
    fn snapshot_preserves_order() {
        let queue = SuggestionQueue::new(vec![
            Suggestion::addition("b", "skills", "1"),
            Suggestion::addition("a", "skills", "2"),
        ]);
        let ids: Vec<String> = queue.snapshot().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
