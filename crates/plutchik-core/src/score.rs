use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FlowerError, ScoreViolation};
use crate::registry::ScoreKind;

/// Slack allowed above 1.0 when checking intensity sums, so that tuples such
/// as `[0.1, 0.2, 0.7]` whose float sum lands a hair over 1 still pass.
/// Scalar scores get no slack.
pub const SCORE_SUM_TOLERANCE: f64 = 1e-9;

/// A category's score: one cumulative value, or low/medium/high intensities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreEntry {
    Cumulative(f64),
    Intensities([f64; 3]),
}

impl ScoreEntry {
    pub fn total(&self) -> f64 {
        match self {
            ScoreEntry::Cumulative(s) => *s,
            ScoreEntry::Intensities(bands) => bands.iter().sum(),
        }
    }

    pub fn is_banded(&self) -> bool {
        matches!(self, ScoreEntry::Intensities(_))
    }

    pub fn validate(&self) -> Result<(), ScoreViolation> {
        match self {
            ScoreEntry::Cumulative(s) => {
                if !s.is_finite() {
                    return Err(ScoreViolation::NotFinite);
                }
                if *s < 0.0 {
                    return Err(ScoreViolation::NegativeComponent(*s));
                }
                if *s > 1.0 {
                    return Err(ScoreViolation::ScalarOutOfRange(*s));
                }
            }
            ScoreEntry::Intensities(bands) => {
                if bands.iter().any(|b| !b.is_finite()) {
                    return Err(ScoreViolation::NotFinite);
                }
                if let Some(negative) = bands.iter().find(|b| **b < 0.0) {
                    return Err(ScoreViolation::NegativeComponent(*negative));
                }
                let sum = self.total();
                if sum > 1.0 + SCORE_SUM_TOLERANCE {
                    return Err(ScoreViolation::SumOutOfRange(sum));
                }
            }
        }
        Ok(())
    }
}

impl From<f64> for ScoreEntry {
    fn from(score: f64) -> Self {
        ScoreEntry::Cumulative(score)
    }
}

impl From<[f64; 3]> for ScoreEntry {
    fn from(bands: [f64; 3]) -> Self {
        ScoreEntry::Intensities(bands)
    }
}

/// Category name to score.
pub type ScoreMap = BTreeMap<String, ScoreEntry>;

/// Reads a JSON object such as `{"joy": 0.4, "fear": [0.1, 0.2, 0.3]}`.
pub fn parse_score_map(json: &str) -> Result<ScoreMap, FlowerError> {
    serde_json::from_str(json).map_err(|e| FlowerError::MalformedJson(e.to_string()))
}

/// Uniform scalar scores for every category of `kind`.
pub fn random_scores<R: Rng + ?Sized>(kind: ScoreKind, rng: &mut R) -> ScoreMap {
    kind.categories()
        .iter()
        .map(|spec| {
            (
                spec.name.to_string(),
                ScoreEntry::Cumulative(rng.gen_range(0.0..=1.0)),
            )
        })
        .collect()
}
