//! Program level model and key normalization

use crate::core::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Program level of the degree (`foundation`, `diploma`, `degree`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Foundation level
    Foundation,
    /// Diploma level (programming and data science)
    Diploma,
    /// BSc/BS degree level
    Degree,
}

impl Level {
    /// All levels in program order
    pub const ALL: [Self; 3] = [Self::Foundation, Self::Diploma, Self::Degree];

    /// Lowercase form used as the catalog bucket key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Diploma => "diploma",
            Self::Degree => "degree",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::Diploma => "Diploma",
            Self::Degree => "Degree",
        }
    }
}

impl FromStr for Level {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "foundation" => Ok(Self::Foundation),
            "diploma" => Ok(Self::Diploma),
            "degree" => Ok(Self::Degree),
            _ => Err(EngineError::UnknownLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize free text into the lowercase, hyphenated form used for catalog keys
///
/// Runs of whitespace, underscores and hyphens collapse into a single `-`, and
/// leading/trailing separators are dropped.
///
/// # Examples
/// ```
/// use gradepoint::core::models::normalize_key;
/// assert_eq!(normalize_key("  Electronic   Systems "), "electronic-systems");
/// assert_eq!(normalize_key("Data_Science"), "data-science");
/// ```
#[must_use]
pub fn normalize_key(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    lowered
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
