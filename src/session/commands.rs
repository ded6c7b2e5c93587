use serde::Deserialize;

use crate::error::ReconcileResult;
use crate::models::suggestion::id_from_string_or_number;
use crate::models::Sections;

use super::controller::{ActionReport, SessionController};
use super::persistence::SyncStatus;
use super::state::{AcceptAllOutcome, AcceptOutcome};

/// User intents coming from a presentation layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    Accept {
        #[serde(deserialize_with = "id_from_string_or_number")]
        id: String,
    },
    AcceptEdited {
        #[serde(deserialize_with = "id_from_string_or_number")]
        id: String,
        suggested: String,
    },
    Reject {
        #[serde(deserialize_with = "id_from_string_or_number")]
        id: String,
    },
    AcceptAll,
    EditSection {
        section: String,
        text: String,
    },
    EditFullText {
        text: String,
    },
    SaveSections {
        sections: Sections,
    },
    SyncForExport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Accepted(ActionReport<AcceptOutcome>),
    Rejected { suggestion_id: String, removed: bool },
    AcceptedAll(ActionReport<AcceptAllOutcome>),
    Edited(ActionReport<()>),
    Exported(SyncStatus),
}

impl ActionOutcome {
    /// Persistence result of the action, if it triggered one.
    pub fn sync(&self) -> Option<&SyncStatus> {
        match self {
            ActionOutcome::Accepted(report) => report.sync.as_ref(),
            ActionOutcome::AcceptedAll(report) => report.sync.as_ref(),
            ActionOutcome::Edited(report) => report.sync.as_ref(),
            ActionOutcome::Exported(status) => Some(status),
            ActionOutcome::Rejected { .. } => None,
        }
    }
}

pub async fn dispatch(
    controller: &SessionController,
    action: SessionAction,
) -> ReconcileResult<ActionOutcome> {
    let outcome = match action {
        SessionAction::Accept { id } => {
            ActionOutcome::Accepted(controller.accept_suggestion(&id).await?)
        }
        SessionAction::AcceptEdited { id, suggested } => {
            ActionOutcome::Accepted(controller.accept_edited(&id, &suggested).await?)
        }
        SessionAction::Reject { id } => {
            let removed = controller.reject_suggestion(&id).await;
            ActionOutcome::Rejected {
                suggestion_id: id,
                removed,
            }
        }
        SessionAction::AcceptAll => ActionOutcome::AcceptedAll(controller.accept_all().await),
        SessionAction::EditSection { section, text } => {
            ActionOutcome::Edited(controller.edit_section(&section, &text).await)
        }
        SessionAction::EditFullText { text } => {
            ActionOutcome::Edited(controller.edit_full_text(&text).await)
        }
        SessionAction::SaveSections { sections } => {
            ActionOutcome::Edited(controller.save_sections(sections).await)
        }
        SessionAction::SyncForExport => ActionOutcome::Exported(controller.sync_for_export().await),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_accept_numeric_ids() {
        let action: SessionAction =
            serde_json::from_str(r#"{"action": "accept", "id": 7}"#).unwrap();
        assert_eq!(action, SessionAction::Accept { id: "7".into() });
    }

    #[test]
    fn save_sections_normalizes_keys() {
        let action: SessionAction = serde_json::from_str(
            r#"{"action": "save_sections", "sections": {"Skills": "Rust"}}"#,
        )
        .unwrap();
        match action {
            SessionAction::SaveSections { sections } => {
                assert_eq!(sections.get("skills"), Some("Rust"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn unit_actions_parse() {
        let action: SessionAction = serde_json::from_str(r#"{"action": "accept_all"}"#).unwrap();
        assert_eq!(action, SessionAction::AcceptAll);
    }
}
