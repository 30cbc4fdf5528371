//! Predict command handler

use gradepoint::core::input::ScoreInput;
use gradepoint::core::models::{LetterGrade, PredictionResult, PredictionStatus, Subject};
use gradepoint::core::Engine;
use gradepoint::{error, info};
use std::fmt::Write;

/// Run the predict command
pub fn run(
    engine: &Engine,
    level: &str,
    key: &str,
    scores: &[String],
    target: Option<LetterGrade>,
) {
    match predict(engine, level, key, scores, target) {
        Ok(report) => print!("{report}"),
        Err(err) => {
            error!("Prediction for {key} failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Validate input, predict one or all grades and format the table
///
/// # Errors
/// Returns a user-facing message for unknown subjects, invalid scores and
/// subjects without an end-term component.
pub fn predict(
    engine: &Engine,
    level: &str,
    key: &str,
    scores: &[String],
    target: Option<LetterGrade>,
) -> Result<String, String> {
    let subject = engine.subject(level, key).map_err(|e| format!("✗ {e}"))?;
    let input = ScoreInput::from_pairs(subject, scores).map_err(|e| format!("✗ {e}"))?;
    let values = input.values();

    let results = match target {
        Some(grade) => engine
            .predict_required_score(level, key, &values, grade)
            .map(|result| vec![result]),
        None => engine.predict_all(level, key, &values),
    }
    .map_err(|e| format!("✗ {e}"))?;

    info!(
        "Predicted {key}: {} of {} targets reachable",
        results.iter().filter(|r| r.possible).count(),
        results.len()
    );
    Ok(render(subject, &results))
}

/// One-word state of a prediction
const fn status_label(status: PredictionStatus) -> &'static str {
    match status {
        PredictionStatus::Achievable => "Possible",
        PredictionStatus::AlreadySecured => "Secured",
        PredictionStatus::Unattainable => "Impossible",
    }
}

/// Format predictions as a table
pub fn render(subject: &Subject, results: &[PredictionResult]) -> String {
    let free = subject
        .free()
        .map_or_else(|| "end term".to_string(), |f| f.label.clone());
    let mut out = String::new();
    let _ = writeln!(out, "\n=== {} ({}) ===\n", subject.name, subject.key);
    let _ = writeln!(out, "  {:<6} {:>10} {:>8}  Status", "Grade", "Required", "Final");
    for r in results {
        let required = r
            .required
            .map_or_else(|| "-".to_string(), |x| format!("{x:.2}"));
        let _ = writeln!(
            out,
            "  {:<6} {:>10} {:>8.2}  {}",
            r.target.as_str(),
            required,
            r.final_grade,
            status_label(r.status)
        );
    }
    let _ = writeln!(out, "\n  Required = minimum {free} score for the grade.");
    out
}
