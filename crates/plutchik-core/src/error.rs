use crate::registry::ScoreKind;
use thiserror::Error;

/// Why a single score entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScoreViolation {
    #[error("negative component {0}")]
    NegativeComponent(f64),
    #[error("scalar score {0} outside [0, 1]")]
    ScalarOutOfRange(f64),
    #[error("intensity sum {0} outside [0, 1]")]
    SumOutOfRange(f64),
    #[error("score is not a finite number")]
    NotFinite,
}

/// Errors raised while classifying scores or laying out a flower.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowerError {
    #[error("score map is empty")]
    EmptyScoreMap,
    #[error("cannot draw {expected} and {found} together (offending key `{category}`)")]
    MixedCategoryKinds {
        category: String,
        expected: ScoreKind,
        found: ScoreKind,
    },
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("category `{0}` appears more than once")]
    DuplicateCategory(String),
    #[error("invalid score for `{category}`: {reason}")]
    InvalidScore {
        category: String,
        reason: ScoreViolation,
    },
    #[error("height/width ratio must be positive, got {0}")]
    InvalidHeightWidthRatio(f64),
    #[error("highlighted category `{category}` is not one of the {kind}")]
    UnknownHighlightCategory { category: String, kind: ScoreKind },
    #[error("intensity label category `{category}` is not one of the {kind}")]
    UnknownIntensityLabelCategory { category: String, kind: ScoreKind },
    #[error("offset radius must lie in (0, 1), got {0}")]
    InvalidOffsetRadius(f64),
    #[error("normalization ceiling must be a positive finite number, got {0}")]
    InvalidNormalization(f64),
    #[error("malformed JSON input: {0}")]
    MalformedJson(String),
}

impl FlowerError {
    pub fn invalid_score(category: impl Into<String>, reason: ScoreViolation) -> Self {
        FlowerError::InvalidScore {
            category: category.into(),
            reason,
        }
    }
}
