//! Domain models owned by a reconciliation session.

pub mod applied_change;
pub mod document;
pub mod score;
pub mod suggestion;

pub use applied_change::AppliedChange;
pub use document::{
    new_document_id, normalize_section_key, section_title, Document, SectionView, Sections,
    SECTION_ORDER,
};
pub use score::{KeywordSet, ScoreBand, ScoreState};
pub use suggestion::{AnalysisResult, ImprovementType, RawSuggestion, Suggestion};
