use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::{
    apply_suggestion_with_report, highlight_lines, reconcile, HighlightSegment, ScoringConfig,
};
use crate::error::{ReconcileError, ReconcileResult};
use crate::models::{
    AnalysisResult, AppliedChange, Document, ScoreBand, ScoreState, SectionView, Sections,
    Suggestion,
};
use crate::{log_info, log_warn};

use super::ledger::AppliedChangeLedger;
use super::persistence::DocumentSnapshot;
use super::queue::SuggestionQueue;

const ENABLE_LOGS: bool = true;

/// A suggestion that went through the patch engine and score reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedSuggestion {
    pub suggestion_id: String,
    pub section: String,
    pub points_gained: u32,
    pub ats_score: u32,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AcceptOutcome {
    Applied(AppliedSuggestion),
    /// The id was already consumed or never issued.
    NotPending { suggestion_id: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptAllOutcome {
    pub applied: Vec<String>,
    /// Suggestions without text. They stay pending.
    pub skipped: Vec<String>,
    pub points_gained: u32,
    pub ats_score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPreview {
    #[serde(flatten)]
    pub section: SectionView,
    pub lines: Vec<Vec<HighlightSegment>>,
}

/// Everything a presentation layer needs to render the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub snapshot: DocumentSnapshot,
    pub score: ScoreState,
    pub band: ScoreBand,
    pub pending: Vec<Suggestion>,
    pub applied: Vec<AppliedChange>,
}

/// Document, score, pending suggestions and ledger of one reconciliation session.
///
/// Every method runs to completion without suspending; the controller wraps
/// each call in a single lock so an accept can never be applied twice.
#[derive(Debug, Clone)]
pub struct SessionState {
    document_id: String,
    document: Document,
    score: ScoreState,
    queue: SuggestionQueue,
    ledger: AppliedChangeLedger,
    revision: i64,
    config: ScoringConfig,
}

impl SessionState {
    /// Seed a session from the uploaded document and the analysis result.
    pub fn seed(
        document_id: impl Into<String>,
        document: Document,
        analysis: AnalysisResult,
        config: ScoringConfig,
    ) -> Self {
        let config = config.clamped();
        let score = ScoreState::seed(
            analysis.ats_score,
            config.max_score,
            analysis.matched_keywords,
            analysis.missing_keywords,
        );
        let queue = SuggestionQueue::new(
            analysis
                .suggestions
                .into_iter()
                .map(|raw| Suggestion::from_raw(raw, &config)),
        );

        Self {
            document_id: document_id.into(),
            document,
            score,
            queue,
            ledger: AppliedChangeLedger::new(),
            // Starts from the clock so a reseeded session outranks earlier ones.
            revision: Utc::now().timestamp_micros(),
            config,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn queue(&self) -> &SuggestionQueue {
        &self.queue
    }

    pub fn ledger(&self) -> &AppliedChangeLedger {
        &self.ledger
    }

    pub fn revision(&self) -> i64 {
        self.revision
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Accept one pending suggestion.
    ///
    /// A suggestion without text is left pending and reported as a
    /// validation error. An unknown id is a no-op.
    pub fn accept_one(&mut self, id: &str, now: DateTime<Utc>) -> ReconcileResult<AcceptOutcome> {
        let actionable = match self.queue.get(id) {
            Some(suggestion) => suggestion.is_actionable(),
            None => return Ok(self.not_pending(id)),
        };
        if !actionable {
            log_warn!("Skipping suggestion {} without suggested text", id);
            return Err(ReconcileError::Validation { id: id.to_string() });
        }

        match self.queue.take(id) {
            Some(suggestion) => Ok(AcceptOutcome::Applied(self.apply(suggestion, now))),
            None => Ok(self.not_pending(id)),
        }
    }

    /// Accept a pending suggestion with caller-edited replacement text.
    pub fn accept_edited(
        &mut self,
        id: &str,
        suggested: &str,
        now: DateTime<Utc>,
    ) -> ReconcileResult<AcceptOutcome> {
        if self.queue.get(id).is_none() {
            return Ok(self.not_pending(id));
        }
        if suggested.is_empty() {
            log_warn!("Skipping edited suggestion {} without text", id);
            return Err(ReconcileError::Validation { id: id.to_string() });
        }

        match self.queue.take(id) {
            Some(suggestion) => {
                let edited = suggestion.with_suggested(suggested);
                Ok(AcceptOutcome::Applied(self.apply(edited, now)))
            }
            None => Ok(self.not_pending(id)),
        }
    }

    /// Discard a pending suggestion without touching the document or score.
    pub fn reject_one(&mut self, id: &str) -> Option<Suggestion> {
        let rejected = self.queue.take(id);
        match &rejected {
            Some(_) => log_info!("Rejected suggestion {}", id),
            None => log_info!("Reject ignored: suggestion {} is not pending", id),
        }
        rejected
    }

    /// Fold every suggestion pending at call time, in original order.
    pub fn accept_all(&mut self, now: DateTime<Utc>) -> AcceptAllOutcome {
        let starting_score = self.score.ats_score;
        let mut outcome = AcceptAllOutcome::default();

        for suggestion in self.queue.snapshot() {
            if !suggestion.is_actionable() {
                log_warn!("Skipping suggestion {} without suggested text", suggestion.id);
                outcome.skipped.push(suggestion.id);
                continue;
            }
            if let Some(pending) = self.queue.take(&suggestion.id) {
                let applied = self.apply(pending, now);
                outcome.applied.push(applied.suggestion_id);
            }
        }

        outcome.ats_score = self.score.ats_score;
        outcome.points_gained = self.score.ats_score - starting_score;
        log_info!(
            "Accepted {} suggestions (+{} points, {} skipped)",
            outcome.applied.len(),
            outcome.points_gained,
            outcome.skipped.len()
        );
        outcome
    }

    /// Manual edit of one section. The full text is left as is.
    pub fn edit_section(&mut self, key: &str, text: impl Into<String>, now: DateTime<Utc>) {
        self.document.set_section(key, text);
        self.bump_revision(now);
    }

    /// Manual edit of the full text. Sections are left as is.
    pub fn edit_full_text(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        self.document.set_full_text(text);
        self.bump_revision(now);
    }

    /// Replace every section and rebuild the full text from them.
    pub fn save_sections(&mut self, sections: Sections, now: DateTime<Utc>) {
        self.document.replace_sections(sections);
        let rebuilt = self.document.rebuild_full_text();
        self.document.set_full_text(rebuilt);
        self.bump_revision(now);
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            document_id: self.document_id.clone(),
            revision: self.revision,
            document: self.document.clone(),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            snapshot: self.snapshot(),
            score: self.score.clone(),
            band: self.score.band(),
            pending: self.queue.snapshot(),
            applied: self.ledger.entries().to_vec(),
        }
    }

    /// Display sections with matched keywords highlighted line by line.
    pub fn preview(&self) -> Vec<SectionPreview> {
        let keywords = self.score.matched_keywords.as_slice();
        self.document
            .display_sections()
            .into_iter()
            .map(|section| SectionPreview {
                lines: highlight_lines(&section.content, keywords),
                section,
            })
            .collect()
    }

    fn apply(&mut self, suggestion: Suggestion, now: DateTime<Utc>) -> AppliedSuggestion {
        let (document, report) = apply_suggestion_with_report(&self.document, &suggestion);
        if report.missed() {
            log_warn!(
                "Suggestion {}: original text not found in document or section '{}'",
                suggestion.id,
                suggestion.section
            );
        }

        let score = reconcile(&self.score, &suggestion, &self.config);
        let points_gained = score.ats_score - self.score.ats_score;

        self.document = document;
        self.score = score;
        self.ledger
            .record(&suggestion.id, &suggestion.section, &suggestion.suggested, now);
        self.bump_revision(now);

        log_info!(
            "Applied suggestion {} to '{}' (+{} points, score {})",
            suggestion.id,
            suggestion.section,
            points_gained,
            self.score.ats_score
        );

        AppliedSuggestion {
            suggestion_id: suggestion.id,
            section: suggestion.section,
            points_gained,
            ats_score: self.score.ats_score,
            remaining: self.queue.len(),
        }
    }

    /// Revisions follow the clock in microseconds but always move forward,
    /// so they stay ordered across sessions on the same document.
    fn bump_revision(&mut self, now: DateTime<Utc>) {
        self.revision = (self.revision + 1).max(now.timestamp_micros());
    }

    fn not_pending(&self, id: &str) -> AcceptOutcome {
        log_info!("Accept ignored: suggestion {} is not pending", id);
        AcceptOutcome::NotPending {
            suggestion_id: id.to_string(),
        }
    }
}
