//! Suggestions as issued by the analysis service, and their normalized form.
//!
//! The analysis service speaks loosely-typed snake_case JSON: ids may be
//! numbers or strings and most fields may be missing. [`RawSuggestion`]
//! mirrors that payload; [`Suggestion`] is what the engine works with, with
//! every default resolved once at intake.

use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::ScoringConfig;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

pub(crate) fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(value) => value.to_string(),
    })
}

/// Suggestion payload exactly as the analysis service emits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSuggestion {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub suggested: Option<String>,
    #[serde(default)]
    pub impact_score: Option<f64>,
    #[serde(default)]
    pub keywords_added: Option<Vec<String>>,
    #[serde(default)]
    pub improvement_type: Option<String>,
}

/// Kind of improvement a suggestion represents. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImprovementType {
    KeywordAddition,
    Rewrite,
    Format,
    Other(String),
}

impl ImprovementType {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "keyword_addition" => ImprovementType::KeywordAddition,
            "rewrite" => ImprovementType::Rewrite,
            "format" => ImprovementType::Format,
            _ => ImprovementType::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImprovementType::KeywordAddition => "keyword_addition",
            ImprovementType::Rewrite => "rewrite",
            ImprovementType::Format => "format",
            ImprovementType::Other(label) => label,
        }
    }

    /// Badge text, e.g. `keyword addition`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Default for ImprovementType {
    fn default() -> Self {
        ImprovementType::Rewrite
    }
}

impl From<String> for ImprovementType {
    fn from(value: String) -> Self {
        ImprovementType::parse(&value)
    }
}

impl From<ImprovementType> for String {
    fn from(value: ImprovementType) -> Self {
        value.as_str().to_string()
    }
}

/// A normalized edit suggestion.
///
/// `original` is `None` for additions. A blank `original` counts as absent.
/// An empty `suggested` marks the suggestion as not actionable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub section: String,
    pub original: Option<String>,
    pub suggested: String,
    pub impact: f64,
    pub keywords_added: Vec<String>,
    pub improvement_type: ImprovementType,
}

impl Suggestion {
    /// Resolve every optional field of an analysis payload.
    pub fn from_raw(raw: RawSuggestion, config: &ScoringConfig) -> Self {
        Self {
            id: raw.id,
            section: raw.section.unwrap_or_default(),
            original: raw.original.filter(|text| !text.trim().is_empty()),
            suggested: raw.suggested.unwrap_or_default(),
            impact: raw.impact_score.unwrap_or(config.default_impact),
            keywords_added: raw.keywords_added.unwrap_or_default(),
            improvement_type: raw
                .improvement_type
                .map(|label| ImprovementType::parse(&label))
                .unwrap_or_default(),
        }
    }

    /// A targeted replacement of `original` with `suggested`.
    pub fn replacement(
        id: impl Into<String>,
        section: impl Into<String>,
        original: impl Into<String>,
        suggested: impl Into<String>,
    ) -> Self {
        let original = original.into();
        Self {
            id: id.into(),
            section: section.into(),
            original: Some(original).filter(|text| !text.trim().is_empty()),
            suggested: suggested.into(),
            impact: ScoringConfig::default().default_impact,
            keywords_added: Vec::new(),
            improvement_type: ImprovementType::Rewrite,
        }
    }

    /// New content appended to a section.
    pub fn addition(
        id: impl Into<String>,
        section: impl Into<String>,
        suggested: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            section: section.into(),
            original: None,
            suggested: suggested.into(),
            impact: ScoringConfig::default().default_impact,
            keywords_added: Vec::new(),
            improvement_type: ImprovementType::KeywordAddition,
        }
    }

    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords_added = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Same suggestion with caller-edited replacement text.
    pub fn with_suggested(mut self, suggested: impl Into<String>) -> Self {
        self.suggested = suggested.into();
        self
    }

    pub fn is_actionable(&self) -> bool {
        !self.suggested.is_empty()
    }

    pub fn impact_percent(&self) -> i64 {
        (self.impact * 100.0).round() as i64
    }
}

impl From<RawSuggestion> for Suggestion {
    fn from(raw: RawSuggestion) -> Self {
        Suggestion::from_raw(raw, &ScoringConfig::default())
    }
}

/// Initial analysis produced by the analysis service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, alias = "score")]
    pub ats_score: i64,
    #[serde(default)]
    pub suggestions: Vec<RawSuggestion>,
    #[serde(default, alias = "keyword_matches")]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_payload_accepts_numeric_and_string_ids() {
        let numeric: RawSuggestion =
            serde_json::from_str(r#"{"id": 1, "suggested": "x"}"#).unwrap();
        let text: RawSuggestion =
            serde_json::from_str(r#"{"id": "sug_1_42", "suggested": "x"}"#).unwrap();

        assert_eq!(numeric.id, "1");
        assert_eq!(text.id, "sug_1_42");
    }

    #[test]
    fn intake_resolves_defaults() {
        let raw: RawSuggestion = serde_json::from_str(
            r#"{"id": "a", "section": "Skills", "original": "   ", "suggested": "Rust"}"#,
        )
        .unwrap();
        let suggestion = Suggestion::from(raw);

        assert_eq!(suggestion.original, None);
        assert_eq!(suggestion.impact, 0.5);
        assert!(suggestion.keywords_added.is_empty());
        assert_eq!(suggestion.improvement_type, ImprovementType::Rewrite);
        assert!(suggestion.is_actionable());
    }

    #[test]
    fn explicit_zero_impact_is_kept() {
        let raw: RawSuggestion =
            serde_json::from_str(r#"{"id": "a", "suggested": "x", "impact_score": 0.0}"#).unwrap();
        assert_eq!(Suggestion::from(raw).impact, 0.0);
    }

    #[test]
    fn impact_percent_rounds_for_display() {
        let suggestion = Suggestion::addition("1", "skills", "Rust");
        assert_eq!(suggestion.impact_percent(), 50);
        assert_eq!(suggestion.clone().with_impact(0.86).impact_percent(), 86);
        assert_eq!(suggestion.clone().with_impact(0.125).impact_percent(), 13);
        assert_eq!(suggestion.with_impact(1.0).impact_percent(), 100);
    }

    #[test]
    fn missing_suggested_text_is_not_actionable() {
        let raw: RawSuggestion = serde_json::from_str(r#"{"id": 7, "section": "skills"}"#).unwrap();
        assert!(!Suggestion::from(raw).is_actionable());
    }

    #[test]
    fn improvement_type_labels() {
        assert_eq!(
            ImprovementType::parse("Keyword Addition"),
            ImprovementType::KeywordAddition
        );
        assert_eq!(ImprovementType::KeywordAddition.label(), "keyword addition");
        assert_eq!(
            ImprovementType::parse("quantify_results").label(),
            "quantify results"
        );
    }

    #[test]
    fn analysis_result_accepts_service_field_names() {
        let analysis: AnalysisResult = serde_json::from_str(
            r#"{"score": 62, "keyword_matches": ["Rust"], "missing_keywords": ["Docker"],
                "suggestions": [{"id": 1, "suggested": "Docker"}]}"#,
        )
        .unwrap();

        assert_eq!(analysis.ats_score, 62);
        assert_eq!(analysis.matched_keywords, vec!["Rust"]);
        assert_eq!(analysis.suggestions.len(), 1);
    }
}
