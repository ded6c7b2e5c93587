use crate::engine::config::ScoringConfig;
use crate::models::{ScoreState, Suggestion};

/// Points a suggestion is worth: clamped impact scaled to the configured range, rounded.
pub fn score_delta(impact: f64, config: &ScoringConfig) -> u32 {
    let impact = if impact.is_nan() { 0.0 } else { impact.clamp(0.0, 1.0) };
    let points = (impact * config.points_per_impact).round();
    if points <= 0.0 {
        0
    } else {
        points as u32
    }
}

/// Fold one applied suggestion into the score state.
///
/// Must run at most once per suggestion id. The session guarantees this by
/// removing the id from the pending queue in the same step.
pub fn reconcile(state: &ScoreState, suggestion: &Suggestion, config: &ScoringConfig) -> ScoreState {
    let delta = score_delta(suggestion.impact, config);
    let capped = state.ats_score.saturating_add(delta).min(config.max_score);

    let mut matched_keywords = state.matched_keywords.clone();
    for keyword in &suggestion.keywords_added {
        matched_keywords.insert(keyword.as_str());
    }

    // Substring match, not whole word: "SQL" is resolved by "PostgreSQL".
    let applied_text = suggestion.suggested.to_lowercase();
    let mut missing_keywords = state.missing_keywords.clone();
    missing_keywords.retain(|keyword| !applied_text.contains(&keyword.to_lowercase()));

    ScoreState {
        ats_score: capped.max(state.ats_score),
        matched_keywords,
        missing_keywords,
    }
}

/// Fold [`reconcile`] over `suggestions` in order.
pub fn reconcile_all<'a, I>(state: &ScoreState, suggestions: I, config: &ScoringConfig) -> ScoreState
where
    I: IntoIterator<Item = &'a Suggestion>,
{
    suggestions
        .into_iter()
        .fold(state.clone(), |current, suggestion| {
            reconcile(&current, suggestion, config)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(score: u32, matched: &[&str], missing: &[&str]) -> ScoreState {
        ScoreState {
            ats_score: score,
            matched_keywords: matched.iter().copied().collect(),
            missing_keywords: missing.iter().copied().collect(),
        }
    }

    #[test]
    fn delta_rounds_clamped_impact() {
        let config = ScoringConfig::default();
        assert_eq!(score_delta(0.5, &config), 5);
        assert_eq!(score_delta(0.86, &config), 9);
        assert_eq!(score_delta(0.84, &config), 8);
        assert_eq!(score_delta(3.0, &config), 10);
        assert_eq!(score_delta(-1.0, &config), 0);
        assert_eq!(score_delta(f64::NAN, &config), 0);
    }

    #[test]
    fn score_is_capped() {
        let config = ScoringConfig::default();
        let suggestion = Suggestion::addition("1", "skills", "Rust").with_impact(0.9);
        let next = reconcile(&state(95, &[], &[]), &suggestion, &config);
        assert_eq!(next.ats_score, 100);
    }

    #[test]
    fn keywords_are_unioned_and_resolved_by_substring() {
        let config = ScoringConfig::default();
        let suggestion = Suggestion::addition("1", "skills", "Deployed on Kubernetes with PostgreSQL")
            .with_keywords(["Kubernetes", "Python"]);
        let next = reconcile(
            &state(50, &["Python"], &["kubernetes", "SQL", "Terraform"]),
            &suggestion,
            &config,
        );

        assert_eq!(next.matched_keywords.as_slice(), &["Python", "Kubernetes"]);
        assert_eq!(next.missing_keywords.as_slice(), &["Terraform"]);
        assert_eq!(next.ats_score, 55);
    }

    #[test]
    fn score_never_decreases_across_a_sequence() {
        let config = ScoringConfig::default();
        let impacts = [0.9, 0.8, 0.7, 1.0, 0.0, 0.6, 0.9, 1.0, 1.0, 1.0, 1.0];
        let mut current = state(40, &[], &[]);
        for (index, impact) in impacts.iter().enumerate() {
            let suggestion = Suggestion::addition(index.to_string(), "summary", "x").with_impact(*impact);
            let next = reconcile(&current, &suggestion, &config);
            assert!(next.ats_score >= current.ats_score);
            assert!(next.ats_score <= 100);
            current = next;
        }
        assert_eq!(current.ats_score, 100);
    }

    #[test]
    fn reconcile_all_matches_sequential() {
        let config = ScoringConfig::default();
        let suggestions = vec![
            Suggestion::addition("1", "skills", "Docker").with_impact(0.9),
            Suggestion::addition("2", "skills", "AWS").with_keywords(["AWS"]),
        ];
        let start = state(60, &[], &["docker", "aws"]);

        let sequential = suggestions
            .iter()
            .fold(start.clone(), |current, s| reconcile(&current, s, &config));
        assert_eq!(reconcile_all(&start, &suggestions, &config), sequential);
        assert_eq!(sequential.ats_score, 74);
        assert!(sequential.missing_keywords.is_empty());
    }
}
