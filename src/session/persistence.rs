use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::models::Document;

/// Immutable copy of a document handed to the store.
///
/// `revision` grows with every local mutation, so a store can discard a
/// snapshot that arrives after a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub document_id: String,
    pub revision: i64,
    pub document: Document,
}

pub type PersistFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// External storage for the current document.
pub trait DocumentStore: Send + Sync {
    fn persist<'a>(&'a self, snapshot: &'a DocumentSnapshot) -> PersistFuture<'a>;
}

/// Result of the persistence call that follows a local mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Synced { revision: i64 },
    /// Local state was kept; the next sync-triggering action retries with newer state.
    Failed(ReconcileError),
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced { .. })
    }

    pub fn error(&self) -> Option<&ReconcileError> {
        match self {
            SyncStatus::Synced { .. } => None,
            SyncStatus::Failed(err) => Some(err),
        }
    }
}
