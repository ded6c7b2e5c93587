use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use crate::error::{ReconcileError, ReconcileResult};
use crate::models::{Sections, Suggestion};
use crate::{log_error, log_info};

use super::persistence::{DocumentSnapshot, DocumentStore, SyncStatus};
use super::state::{
    AcceptAllOutcome, AcceptOutcome, SectionPreview, SessionState, SessionView,
};

const ENABLE_LOGS: bool = true;
const EVENT_CAPACITY: usize = 64;

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    #[serde(rename_all = "camelCase")]
    StateChanged {
        revision: i64,
        ats_score: u32,
        pending: usize,
    },
    #[serde(rename_all = "camelCase")]
    SuggestionApplied {
        suggestion_id: String,
        points_gained: u32,
    },
    #[serde(rename_all = "camelCase")]
    SuggestionRejected { suggestion_id: String },
    Synced { revision: i64 },
    SyncFailed { revision: i64, message: String },
}

/// Local outcome of an action plus the persistence result that followed it.
///
/// `sync` is `None` when the action changed nothing that needs persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport<T> {
    pub outcome: T,
    pub sync: Option<SyncStatus>,
}

#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    store: Arc<dyn DocumentStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(state: SessionState, store: Arc<dyn DocumentStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(state)),
            store,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn get_view(&self) -> SessionView {
        self.state.lock().await.view()
    }

    pub async fn get_preview(&self) -> Vec<SectionPreview> {
        self.state.lock().await.preview()
    }

    pub async fn pending(&self) -> Vec<Suggestion> {
        self.state.lock().await.queue().snapshot()
    }

    pub async fn accept_suggestion(&self, id: &str) -> ReconcileResult<ActionReport<AcceptOutcome>> {
        let (outcome, snapshot) = {
            let mut state = self.state.lock().await;
            let outcome = state.accept_one(id, Utc::now())?;
            (outcome, state.snapshot())
        };
        self.finish_accept(outcome, snapshot).await
    }

    pub async fn accept_edited(
        &self,
        id: &str,
        suggested: &str,
    ) -> ReconcileResult<ActionReport<AcceptOutcome>> {
        let (outcome, snapshot) = {
            let mut state = self.state.lock().await;
            let outcome = state.accept_edited(id, suggested, Utc::now())?;
            (outcome, state.snapshot())
        };
        self.finish_accept(outcome, snapshot).await
    }

    /// Returns whether a pending suggestion was removed. Never persists.
    pub async fn reject_suggestion(&self, id: &str) -> bool {
        let (rejected, pending) = {
            let mut state = self.state.lock().await;
            let rejected = state.reject_one(id).is_some();
            (rejected, state.queue().len())
        };

        if rejected {
            let _ = self.events.send(SessionEvent::SuggestionRejected {
                suggestion_id: id.to_string(),
            });
            log_info!("{} suggestions remaining", pending);
        }
        rejected
    }

    /// Fold every pending suggestion, then persist once.
    pub async fn accept_all(&self) -> ActionReport<AcceptAllOutcome> {
        let (outcome, snapshot, pending) = {
            let mut state = self.state.lock().await;
            let outcome = state.accept_all(Utc::now());
            (outcome, state.snapshot(), state.queue().len())
        };

        if outcome.applied.is_empty() {
            return ActionReport {
                outcome,
                sync: None,
            };
        }

        self.emit_state_changed(&snapshot, outcome.ats_score, pending);
        let sync = self.sync(snapshot).await;
        ActionReport {
            outcome,
            sync: Some(sync),
        }
    }

    pub async fn edit_section(&self, key: &str, text: &str) -> ActionReport<()> {
        let (snapshot, ats_score, pending) = {
            let mut state = self.state.lock().await;
            state.edit_section(key, text, Utc::now());
            (state.snapshot(), state.score().ats_score, state.queue().len())
        };
        self.finish_edit(snapshot, ats_score, pending).await
    }

    pub async fn edit_full_text(&self, text: &str) -> ActionReport<()> {
        let (snapshot, ats_score, pending) = {
            let mut state = self.state.lock().await;
            state.edit_full_text(text, Utc::now());
            (state.snapshot(), state.score().ats_score, state.queue().len())
        };
        self.finish_edit(snapshot, ats_score, pending).await
    }

    pub async fn save_sections(&self, sections: Sections) -> ActionReport<()> {
        let (snapshot, ats_score, pending) = {
            let mut state = self.state.lock().await;
            state.save_sections(sections, Utc::now());
            (state.snapshot(), state.score().ats_score, state.queue().len())
        };
        self.finish_edit(snapshot, ats_score, pending).await
    }

    /// Persist the current document ahead of an export.
    pub async fn sync_for_export(&self) -> SyncStatus {
        let snapshot = self.state.lock().await.snapshot();
        self.sync(snapshot).await
    }

    async fn finish_accept(
        &self,
        outcome: AcceptOutcome,
        snapshot: DocumentSnapshot,
    ) -> ReconcileResult<ActionReport<AcceptOutcome>> {
        let applied = match &outcome {
            AcceptOutcome::Applied(applied) => applied,
            AcceptOutcome::NotPending { .. } => {
                return Ok(ActionReport {
                    outcome,
                    sync: None,
                })
            }
        };

        let _ = self.events.send(SessionEvent::SuggestionApplied {
            suggestion_id: applied.suggestion_id.clone(),
            points_gained: applied.points_gained,
        });
        self.emit_state_changed(&snapshot, applied.ats_score, applied.remaining);

        let sync = self.sync(snapshot).await;
        Ok(ActionReport {
            outcome,
            sync: Some(sync),
        })
    }

    async fn finish_edit(
        &self,
        snapshot: DocumentSnapshot,
        ats_score: u32,
        pending: usize,
    ) -> ActionReport<()> {
        self.emit_state_changed(&snapshot, ats_score, pending);

        let sync = self.sync(snapshot).await;
        ActionReport {
            outcome: (),
            sync: Some(sync),
        }
    }

    /// Runs after the local step has committed. Failure is reported, never rolled back.
    async fn sync(&self, snapshot: DocumentSnapshot) -> SyncStatus {
        match self.store.persist(&snapshot).await {
            Ok(()) => {
                log_info!(
                    "Synced document {} at revision {}",
                    snapshot.document_id,
                    snapshot.revision
                );
                let _ = self.events.send(SessionEvent::Synced {
                    revision: snapshot.revision,
                });
                SyncStatus::Synced {
                    revision: snapshot.revision,
                }
            }
            Err(err) => {
                log_error!(
                    "Failed to sync document {} at revision {}: {:#}",
                    snapshot.document_id,
                    snapshot.revision,
                    err
                );
                let message = format!("{err:#}");
                let _ = self.events.send(SessionEvent::SyncFailed {
                    revision: snapshot.revision,
                    message: message.clone(),
                });
                SyncStatus::Failed(ReconcileError::Sync {
                    document_id: snapshot.document_id,
                    message,
                })
            }
        }
    }

    fn emit_state_changed(&self, snapshot: &DocumentSnapshot, ats_score: u32, pending: usize) {
        let _ = self.events.send(SessionEvent::StateChanged {
            revision: snapshot.revision,
            ats_score,
            pending,
        });
    }
}
