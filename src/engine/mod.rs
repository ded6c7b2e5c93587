pub mod config;
pub mod highlight;
pub mod patch;
pub mod scoring;

pub use config::{ScoringConfig, MAX_ATS_SCORE};
pub use highlight::{highlight, highlight_lines, HighlightSegment};
pub use patch::{apply_all, apply_suggestion, apply_suggestion_with_report, replace_first, PatchReport};
pub use scoring::{reconcile, reconcile_all, score_delta};
