//! Errors raised by the grade evaluation engine

use crate::core::models::Level;
use std::fmt;

/// Failure of an engine lookup or computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Level text did not name a known program level
    UnknownLevel(String),
    /// No subject with this key exists at the level
    SubjectNotFound {
        /// Level searched
        level: Level,
        /// Key requested
        key: String,
    },
    /// The subject has no free component to solve for
    NoFreeField(String),
    /// The formula can decrease as the free component grows, so it cannot be inverted
    NotMonotone(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unknown level '{level}' (expected foundation, diploma or degree)"
            ),
            Self::SubjectNotFound { level, key } => {
                write!(f, "no subject '{key}' at {level} level")
            }
            Self::NoFreeField(key) => {
                write!(f, "subject '{key}' has no end-term component to predict")
            }
            Self::NotMonotone(key) => write!(
                f,
                "formula of '{key}' is not non-decreasing in its end-term component"
            ),
        }
    }
}

impl std::error::Error for EngineError {}
