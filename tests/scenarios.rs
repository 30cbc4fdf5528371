//! End-to-end grading, prediction and CGPA scenarios over the built-in catalog

use gradepoint::core::cgpa::{CgpaCalculator, PriorRecord};
use gradepoint::core::models::{GradePoint, LetterGrade, PredictionStatus};
use gradepoint::core::predictor::{self, Method};
use gradepoint::core::{Catalog, Engine, EngineError};
use std::collections::HashMap;

fn values(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

#[test]
fn python_weights_best_and_worst_oppe() {
    let catalog = Catalog::builtin();
    let engine = Engine::new(&catalog);
    let inputs = values(&[("Qz1", 80.0), ("OPPE1", 90.0), ("OPPE2", 70.0), ("F", 0.0)]);

    let raw = engine
        .evaluate("foundation", "python", &inputs)
        .expect("python exists");
    assert!((raw - 48.5).abs() < 1e-9);

    let result = engine
        .grade("foundation", "python", &inputs)
        .expect("python exists");
    assert!((result.score - 48.5).abs() < 1e-9);
    assert_eq!(result.letter, LetterGrade::E);
    assert_eq!(result.points, 4);
}

#[test]
fn maths1_full_marks_is_s() {
    let catalog = Catalog::builtin();
    let engine = Engine::new(&catalog);
    let inputs = values(&[("Qz1", 100.0), ("Qz2", 100.0), ("F", 100.0)]);

    let result = engine
        .grade("foundation", "maths1", &inputs)
        .expect("maths1 exists");
    assert!((result.score - 100.0).abs() < 1e-9);
    assert_eq!(result.letter, LetterGrade::S);
    assert_eq!(result.points, 10);
}

#[test]
fn cgpa_with_prior_record() {
    let mut calculator = CgpaCalculator::new();
    calculator.set_prior(PriorRecord::from_form("8.0", "40", ""));
    calculator.add_course("Python", 4.0, GradePoint::new(10).expect("valid grade"));

    let summary = calculator.summary();
    assert!((summary.cumulative_cgpa - 360.0 / 44.0).abs() < 1e-9);
    assert!((summary.semester_gpa - 10.0).abs() < 1e-9);
    assert!((summary.total_credits - 44.0).abs() < 1e-9);
}

#[test]
fn maths1_s_out_of_reach_with_average_quizzes() {
    let catalog = Catalog::builtin();
    let engine = Engine::new(&catalog);
    let inputs = values(&[("Qz1", 60.0), ("Qz2", 60.0)]);

    let prediction = engine
        .predict_required_score("foundation", "maths1", &inputs, LetterGrade::S)
        .expect("maths1 is solvable");
    assert!(!prediction.possible);
    assert_eq!(prediction.status, PredictionStatus::Unattainable);
    assert_eq!(prediction.required, None);
    // Best achievable with F=100 is max(78, 78) = 78
    assert!((prediction.final_grade - 78.0).abs() < 1e-9);

    // 18 + 0.6F reaches 90 first, at F = 120
    let subject = engine.subject("foundation", "maths1").expect("maths1 exists");
    let solution = predictor::solve(subject, &inputs, 90.0).expect("solvable");
    assert_eq!(solution.method, Method::Analytic { arm: 0 });
    assert!((solution.value - 120.0).abs() < 1e-9);
}

#[test]
fn maths1_reachable_grades_round_up() {
    let catalog = Catalog::builtin();
    let engine = Engine::new(&catalog);
    let inputs = values(&[("Qz1", 60.0), ("Qz2", 60.0)]);

    let all = engine
        .predict_all("foundation", "maths1", &inputs)
        .expect("maths1 is solvable");
    assert_eq!(all.len(), 6);

    // Below F = 100 the 33 + 0.45F arm leads: 69.995 at F = 82.211..., rounded up
    let b = &all[2];
    assert_eq!(b.target, LetterGrade::B);
    assert_eq!(b.required, Some(82.22));
    assert!(b.final_grade >= 70.0);

    let e = &all[5];
    assert_eq!(e.status, PredictionStatus::Achievable);
    assert_eq!(e.required, Some(15.55));
}

#[test]
fn prediction_agrees_with_grader_on_rounded_scores() {
    let catalog = Catalog::builtin();
    let engine = Engine::new(&catalog);
    let quizzes = values(&[("Qz1", 0.0), ("Qz2", 99.987)]);

    let mut full = quizzes.clone();
    full.insert("F".to_string(), 100.0);
    let graded = engine
        .grade("foundation", "maths1", &full)
        .expect("maths1 exists");
    assert_eq!(graded.letter, LetterGrade::S);

    let predicted = engine
        .predict_required_score("foundation", "maths1", &quizzes, LetterGrade::S)
        .expect("maths1 is solvable");
    assert!(predicted.possible);
    assert_eq!(predicted.status, PredictionStatus::Achievable);
    assert_eq!(predicted.required, Some(100.0));
}

#[test]
fn strong_quizzes_already_secure_a_pass() {
    let catalog = Catalog::builtin();
    let engine = Engine::new(&catalog);
    let inputs = values(&[("GAA", 100.0), ("Qz1", 100.0), ("Qz2", 100.0)]);

    let e = engine
        .predict_required_score("foundation", "ct", &inputs, LetterGrade::E)
        .expect("ct is solvable");
    assert_eq!(e.status, PredictionStatus::AlreadySecured);
    assert!(!e.possible);
    // 10 + max(30, 45) with F = 0
    assert!((e.final_grade - 55.0).abs() < 1e-9);
}

#[test]
fn unknown_inputs_are_explicit_errors() {
    let catalog = Catalog::builtin();
    let engine = Engine::new(&catalog);

    assert!(matches!(
        engine.grade("masters", "maths1", &HashMap::new()),
        Err(EngineError::UnknownLevel(_))
    ));
    assert!(matches!(
        engine.grade("diploma", "maths1", &HashMap::new()),
        Err(EngineError::SubjectNotFound { .. })
    ));
}

#[test]
fn degree_electronic_systems_has_no_subjects() {
    let catalog = Catalog::builtin();
    assert!(catalog.subjects("degree", "Electronic Systems").is_empty());
    assert!(!catalog.subjects("foundation", "Electronic Systems").is_empty());
}
