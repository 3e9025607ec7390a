//! Ranking entry returned by top-N queries.

use serde::Serialize;

/// A long URL and its visit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedLink {
    pub url: String,
    pub score: u64,
}

impl RankedLink {
    pub fn new(url: impl Into<String>, score: u64) -> Self {
        Self {
            url: url.into(),
            score,
        }
    }

    /// Builds an entry from a raw sorted-set score.
    ///
    /// Scores are only ever written by integer increments, so truncation is
    /// exact; negative or NaN scores clamp to zero.
    pub fn from_score(url: impl Into<String>, score: f64) -> Self {
        Self::new(url, score_to_count(score))
    }
}

pub(crate) fn score_to_count(score: f64) -> u64 {
    if score.is_finite() && score > 0.0 {
        score as u64
    } else {
        0
    }
}
