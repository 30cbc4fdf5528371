//! Grade command handler

use gradepoint::core::grading;
use gradepoint::core::input::ScoreInput;
use gradepoint::core::models::{GradeResult, Subject};
use gradepoint::core::Engine;
use gradepoint::{error, info};
use std::fmt::Write;

/// Run the grade command
pub fn run(engine: &Engine, level: &str, key: &str, scores: &[String]) {
    match grade(engine, level, key, scores) {
        Ok(report) => print!("{report}"),
        Err(err) => {
            error!("Grading {key} failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Validate input, grade the subject and format the result
///
/// # Errors
/// Returns a user-facing message for unknown subjects and invalid scores.
pub fn grade(engine: &Engine, level: &str, key: &str, scores: &[String]) -> Result<String, String> {
    let subject = engine.subject(level, key).map_err(|e| format!("✗ {e}"))?;
    let input = ScoreInput::from_pairs(subject, scores).map_err(|e| format!("✗ {e}"))?;
    let result = grading::grade(subject, &input.values());
    info!(
        "Graded {key}: {:.2} ({}, {} points)",
        result.score, result.letter, result.points
    );
    Ok(render(subject, &input, &result))
}

/// Format the inputs and the graded result
pub fn render(subject: &Subject, input: &ScoreInput, result: &GradeResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== {} ({}) ===\n", subject.name, subject.key);
    for field in &subject.fields {
        let raw = input.display(&field.id);
        let shown = if raw.is_empty() { "-" } else { raw };
        let _ = writeln!(out, "  {:<24} {shown:>8}", field.label);
    }
    let _ = writeln!(out, "\n  Score:  {:.2} / 100", result.score);
    let _ = writeln!(out, "  Grade:  {} ({} points)", result.letter, result.points);
    out
}
