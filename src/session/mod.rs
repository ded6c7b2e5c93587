pub mod commands;
pub mod controller;
pub mod ledger;
pub mod persistence;
pub mod queue;
pub mod state;

pub use commands::{dispatch, ActionOutcome, SessionAction};
pub use controller::{ActionReport, SessionController, SessionEvent};
pub use ledger::AppliedChangeLedger;
pub use persistence::{DocumentSnapshot, DocumentStore, PersistFuture, SyncStatus};
pub use queue::SuggestionQueue;
pub use state::{
    AcceptAllOutcome, AcceptOutcome, AppliedSuggestion, SectionPreview, SessionState, SessionView,
};
