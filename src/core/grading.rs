//! Grade classification and the forward grading pipeline

use crate::core::models::{GradeResult, LetterGrade, Subject};
use std::collections::HashMap;

/// Letter grade for a score: first descending threshold the score reaches
///
/// # Examples
/// ```
/// use gradepoint::core::grading::letter;
/// use gradepoint::core::models::LetterGrade;
/// assert_eq!(letter(90.0), LetterGrade::S);
/// assert_eq!(letter(89.99), LetterGrade::A);
/// assert_eq!(letter(12.0), LetterGrade::U);
/// ```
#[must_use]
pub fn letter(score: f64) -> LetterGrade {
    LetterGrade::PASSING
        .into_iter()
        .find(|grade| score >= grade.threshold())
        .unwrap_or(LetterGrade::U)
}

/// Grade points for a score (10, 9, 8, 7, 6, 4, 0)
#[must_use]
pub fn points(score: f64) -> u8 {
    letter(score).points()
}

/// Round half away from zero to 2 decimal places
#[must_use]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Evaluate a subject and classify the result
///
/// The raw score is clamped to `[0, 100]` and rounded to 2 decimal places
/// before classification, so the displayed score and letter always agree.
#[must_use]
pub fn grade(subject: &Subject, values: &HashMap<String, f64>) -> GradeResult {
    classify(subject.evaluate(values))
}

/// Clamp, round and classify a raw score
#[must_use]
pub fn classify(raw: f64) -> GradeResult {
    let score = round2(raw.clamp(0.0, 100.0));
    let letter = letter(score);
    GradeResult {
        score,
        letter,
        points: letter.points(),
    }
}
