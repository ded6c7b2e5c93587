use serde::{Deserialize, Serialize};

/// Highest ATS score any configuration may allow.
pub const MAX_ATS_SCORE: u32 = 100;

/// Tunable constants for incremental score reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Impact assumed when the analysis service omits `impact_score`
    pub default_impact: f64,

    /// Points awarded for an impact of 1.0
    pub points_per_impact: f64,

    /// Upper bound of the ATS score
    pub max_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_impact: 0.5,
            points_per_impact: 10.0,
            max_score: 100,
        }
    }
}

impl ScoringConfig {
    /// Same configuration with `max_score` held to [`MAX_ATS_SCORE`].
    pub fn clamped(mut self) -> Self {
        self.max_score = self.max_score.min(MAX_ATS_SCORE);
        self
    }
}
