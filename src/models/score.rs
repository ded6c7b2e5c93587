//! Score state: ATS score plus matched and missing keyword sets.

use serde::{Deserialize, Serialize};

/// Insertion-ordered set of keywords with exact-match deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the keyword was already present.
    pub fn insert(&mut self, keyword: impl Into<String>) -> bool {
        let keyword = keyword.into();
        if self.0.contains(&keyword) {
            return false;
        }
        self.0.push(keyword);
        true
    }

    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.0.retain(|keyword| keep(keyword));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

/// Coarse rating shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    NeedsImprovement,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn for_score(score: u32) -> Self {
        match score {
            0..=39 => ScoreBand::NeedsImprovement,
            40..=59 => ScoreBand::Fair,
            60..=79 => ScoreBand::Good,
            _ => ScoreBand::Excellent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::NeedsImprovement => "Needs improvement",
            ScoreBand::Fair => "Fair match",
            ScoreBand::Good => "Good match",
            ScoreBand::Excellent => "Excellent match!",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    pub ats_score: u32,
    pub matched_keywords: KeywordSet,
    pub missing_keywords: KeywordSet,
}

impl ScoreState {
    /// Seed from an analysis score, clamped into `0..=max_score`.
    pub fn seed<M, N>(ats_score: i64, max_score: u32, matched: M, missing: N) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            ats_score: ats_score.clamp(0, i64::from(max_score)) as u32,
            matched_keywords: matched.into_iter().collect(),
            missing_keywords: missing.into_iter().collect(),
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.ats_score)
    }
}
