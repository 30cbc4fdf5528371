//! `(level, subject, values)` entry points over an injected catalog

use crate::core::catalog::Catalog;
use crate::core::error::EngineError;
use crate::core::models::{GradeResult, Level, LetterGrade, PredictionResult, Subject};
use crate::core::{grading, predictor};
use std::collections::HashMap;

/// Grade evaluation engine bound to one catalog
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    catalog: &'a Catalog,
}

impl<'a> Engine<'a> {
    /// Create an engine over `catalog`
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// The catalog this engine reads from
    #[must_use]
    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Resolve a subject by level text and key
    ///
    /// # Errors
    /// Returns [`EngineError::UnknownLevel`] or [`EngineError::SubjectNotFound`].
    pub fn subject(&self, level: &str, key: &str) -> Result<&'a Subject, EngineError> {
        let level: Level = level.parse()?;
        self.catalog
            .find(level, key)
            .ok_or_else(|| EngineError::SubjectNotFound {
                level,
                key: key.to_string(),
            })
    }

    /// Raw formula score; fields missing from `values` read as 0
    ///
    /// # Errors
    /// Returns an error if the level or subject is unknown.
    pub fn evaluate(
        &self,
        level: &str,
        key: &str,
        values: &HashMap<String, f64>,
    ) -> Result<f64, EngineError> {
        Ok(self.subject(level, key)?.evaluate(values))
    }

    /// Score, letter and points for a subject
    ///
    /// # Errors
    /// Returns an error if the level or subject is unknown.
    pub fn grade(
        &self,
        level: &str,
        key: &str,
        values: &HashMap<String, f64>,
    ) -> Result<GradeResult, EngineError> {
        Ok(grading::grade(self.subject(level, key)?, values))
    }

    /// Score needed on the subject's free component to reach `target`
    ///
    /// # Errors
    /// Returns an error if the level or subject is unknown, or the subject
    /// cannot be solved for (see [`predictor::solve`]).
    pub fn predict_required_score(
        &self,
        level: &str,
        key: &str,
        values: &HashMap<String, f64>,
        target: LetterGrade,
    ) -> Result<PredictionResult, EngineError> {
        predictor::predict(self.subject(level, key)?, values, target)
    }

    /// Predictions for every passing grade
    ///
    /// # Errors
    /// Same as [`Self::predict_required_score`].
    pub fn predict_all(
        &self,
        level: &str,
        key: &str,
        values: &HashMap<String, f64>,
    ) -> Result<Vec<PredictionResult>, EngineError> {
        predictor::predict_all(self.subject(level, key)?, values)
    }
}
