use serde::Serialize;
use std::fmt;

use super::engine::ScoreResult;

/// Display label derived purely from the headline score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreLabel {
    #[serde(rename = "Very Promising")]
    VeryPromising,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Needs Validation")]
    NeedsValidation,
}

impl ScoreLabel {
    pub fn from_pct(pct: u8) -> Self {
        if pct >= 70 {
            ScoreLabel::VeryPromising
        } else if pct >= 50 {
            ScoreLabel::Moderate
        } else {
            ScoreLabel::NeedsValidation
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::VeryPromising => "Very Promising",
            ScoreLabel::Moderate => "Moderate",
            ScoreLabel::NeedsValidation => "Needs Validation",
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored item with its 1-based position in the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct Ranked<T> {
    pub rank: usize,
    #[serde(flatten)]
    pub item: T,
    pub score: u8,
    pub label: ScoreLabel,
    pub result: ScoreResult,
}

/// Sort by score descending and number the result from 1.
///
/// The sort is stable, so equal scores keep their input order.
pub fn rank<T>(scored: Vec<(T, ScoreResult)>) -> Vec<Ranked<T>> {
    let mut scored = scored;
    scored.sort_by(|a, b| b.1.opportunity_pct.cmp(&a.1.opportunity_pct));

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (item, result))| Ranked {
            rank: idx + 1,
            item,
            score: result.opportunity_pct,
            label: ScoreLabel::from_pct(result.opportunity_pct),
            result,
        })
        .collect()
}
