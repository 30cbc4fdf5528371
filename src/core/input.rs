//! Raw score input as typed into a subject's form
//!
//! Text is validated and clamped before it is stored, but kept as text so a
//! blank field stays blank instead of turning into "0". Numbers are only
//! produced when the form is evaluated.

use crate::core::models::{Subject, SubjectField};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Digits with at most one decimal point; the empty string is allowed
static NUMERIC_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d*\.?\d*$").expect("numeric input pattern is valid")
});

/// Rejected input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The subject has no field with this id
    UnknownField(String),
    /// The text is not an unsigned decimal number
    NotNumeric {
        /// Field id
        field: String,
        /// Rejected text
        text: String,
    },
    /// A `FIELD=VALUE` pair is missing its `=`
    MalformedPair(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(id) => write!(f, "unknown field '{id}'"),
            Self::NotNumeric { field, text } => {
                write!(f, "value '{text}' for field '{field}' is not a number")
            }
            Self::MalformedPair(pair) => write!(f, "expected FIELD=VALUE, got '{pair}'"),
        }
    }
}

impl std::error::Error for InputError {}

/// `parseFloat`-style reading: the longest numeric prefix, else 0
///
/// # Examples
/// ```
/// use gradepoint::core::input::parse_lenient;
/// assert_eq!(parse_lenient("72.5"), 72.5);
/// assert_eq!(parse_lenient("12abc"), 12.0);
/// assert_eq!(parse_lenient(""), 0.0);
/// assert_eq!(parse_lenient("."), 0.0);
/// ```
#[must_use]
pub fn parse_lenient(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        if b.is_ascii_digit() {
            end += 1;
        } else if b == b'.' && !seen_dot {
            seen_dot = true;
            end += 1;
        } else {
            break;
        }
    }

    // Trim back until the prefix parses ("5." parses, "." and "-" do not)
    while end > 0 {
        if let Ok(value) = text[..end].parse::<f64>() {
            return if value.is_finite() { value } else { 0.0 };
        }
        end -= 1;
    }
    0.0
}

/// Format a bound the way a user would type it (`100`, `2.5`)
fn bound_text(value: f64) -> String {
    format!("{value}")
}

/// Form state for one subject: field id → raw text, in field order
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInput {
    fields: Vec<SubjectField>,
    raw: Vec<String>,
}

impl ScoreInput {
    /// Empty form for a subject
    #[must_use]
    pub fn new(subject: &Subject) -> Self {
        Self {
            fields: subject.fields.clone(),
            raw: vec![String::new(); subject.fields.len()],
        }
    }

    /// Build a form from `FIELD=VALUE` pairs
    ///
    /// # Errors
    /// Returns the first malformed pair, unknown field or non-numeric value.
    pub fn from_pairs<S: AsRef<str>>(subject: &Subject, pairs: &[S]) -> Result<Self, InputError> {
        let mut input = Self::new(subject);
        for pair in pairs {
            let pair = pair.as_ref();
            let (field, value) = pair
                .split_once('=')
                .ok_or_else(|| InputError::MalformedPair(pair.to_string()))?;
            input.set(field.trim(), value.trim())?;
        }
        Ok(input)
    }

    fn index(&self, field: &str) -> Result<usize, InputError> {
        self.fields
            .iter()
            .position(|f| f.id == field)
            .ok_or_else(|| InputError::UnknownField(field.to_string()))
    }

    /// Store text for a field, clamping numbers to the field's bounds
    ///
    /// # Errors
    /// Returns an error if the field is unknown or the text is not an
    /// unsigned decimal number. Rejected text leaves the previous value.
    pub fn set(&mut self, field: &str, text: &str) -> Result<(), InputError> {
        let index = self.index(field)?;
        if !NUMERIC_TEXT.is_match(text) {
            return Err(InputError::NotNumeric {
                field: field.to_string(),
                text: text.to_string(),
            });
        }

        let spec = &self.fields[index];
        let stored = match text.parse::<f64>() {
            Ok(value) if value > spec.max => bound_text(spec.max),
            Ok(value) if value < spec.min => bound_text(spec.min),
            _ => text.to_string(),
        };
        self.raw[index] = stored;
        Ok(())
    }

    /// Blank a field
    ///
    /// # Errors
    /// Returns an error if the field is unknown.
    pub fn clear(&mut self, field: &str) -> Result<(), InputError> {
        let index = self.index(field)?;
        self.raw[index].clear();
        Ok(())
    }

    /// Raw text of a field (empty when blank or unknown)
    #[must_use]
    pub fn display(&self, field: &str) -> &str {
        self.index(field).map_or("", |i| self.raw[i].as_str())
    }

    /// Whether a field has no text
    #[must_use]
    pub fn is_blank(&self, field: &str) -> bool {
        self.display(field).is_empty()
    }

    /// Numeric values for evaluation; blank or partial text reads as 0
    #[must_use]
    pub fn values(&self) -> HashMap<String, f64> {
        self.fields
            .iter()
            .zip(&self.raw)
            .map(|(field, raw)| (field.id.clone(), parse_lenient(raw)))
            .collect()
    }

    /// Field ids with their raw text, in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .zip(&self.raw)
            .map(|(field, raw)| (field.id.as_str(), raw.as_str()))
    }
}
