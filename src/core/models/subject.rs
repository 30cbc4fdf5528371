//! Subject and scoring-field models

use crate::core::formula::Expr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One scoreable component of a subject (quiz, assignment average, exam, bonus)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectField {
    /// Identifier used in formulas (e.g., "Qz1", "F")
    pub id: String,
    /// Display label (e.g., "Quiz 1")
    pub label: String,
    /// Lowest accepted raw value
    #[serde(default)]
    pub min: f64,
    /// Highest accepted raw value
    #[serde(default = "default_max")]
    pub max: f64,
}

const fn default_max() -> f64 {
    100.0
}

impl SubjectField {
    /// Create a field with the usual `[0, 100]` bounds
    #[must_use]
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            min: 0.0,
            max: default_max(),
        }
    }

    /// Bound a value to `[min, max]`
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// A subject with its scoring fields and its grading formula
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    /// Dispatch key (e.g., "maths1")
    pub key: String,
    /// Display name
    pub name: String,
    /// Credit value of the course
    pub credits: f64,
    /// Scoring fields in display order
    pub fields: Vec<SubjectField>,
    /// Parsed grading formula
    pub formula: Expr,
    /// Field solved for by the predictor, usually the end-term exam `F`
    pub free_field: Option<String>,
}

impl Subject {
    /// Look up a field by id
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&SubjectField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// The free field's definition, if the subject has one
    #[must_use]
    pub fn free(&self) -> Option<&SubjectField> {
        self.free_field.as_deref().and_then(|id| self.field(id))
    }

    /// Raw formula score for the given values (missing fields read as 0)
    #[must_use]
    pub fn evaluate(&self, values: &HashMap<String, f64>) -> f64 {
        self.formula.eval(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formula::parse;

    fn sample() -> Subject {
        Subject {
            key: "ct".to_string(),
            name: "Computational Thinking".to_string(),
            credits: 4.0,
            fields: vec![SubjectField::new("Qz1", "Quiz 1"), SubjectField::new("F", "End Term")],
            formula: parse("0.4*Qz1 + 0.6*F").expect("valid formula"),
            free_field: Some("F".to_string()),
        }
    }

    #[test]
    fn test_field_lookup() {
        let subject = sample();
        assert_eq!(subject.field("Qz1").map(|f| f.label.as_str()), Some("Quiz 1"));
        assert!(subject.field("Qz2").is_none());
        assert_eq!(subject.free().map(|f| f.id.as_str()), Some("F"));
    }

    #[test]
    fn test_evaluate_reads_missing_as_zero() {
        let subject = sample();
        let values = HashMap::from([("F".to_string(), 50.0)]);
        assert!((subject.evaluate(&values) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamp() {
        let mut bonus = SubjectField::new("Bonus", "Bonus");
        bonus.max = 5.0;
        assert!((bonus.clamp(12.0) - 5.0).abs() < f64::EPSILON);
        assert!(bonus.clamp(-1.0).abs() < f64::EPSILON);
    }
}
