//! Properties that hold for every subject in the built-in catalog

use gradepoint::core::cgpa::{self, PriorRecord};
use gradepoint::core::grading;
use gradepoint::core::models::{Course, GradePoint, LetterGrade, PredictionStatus, Subject};
use gradepoint::core::{predictor, Catalog};
use std::collections::HashMap;

const TOLERANCE: f64 = 1e-9;

/// Every non-free field at `share` of its range; the free field is left out
fn partial_values(subject: &Subject, share: f64) -> HashMap<String, f64> {
    subject
        .fields
        .iter()
        .filter(|f| subject.free_field.as_deref() != Some(f.id.as_str()))
        .map(|f| (f.id.clone(), (f.max - f.min).mul_add(share, f.min)))
        .collect()
}

#[test]
fn scores_stay_within_bounds() {
    let catalog = Catalog::builtin();
    assert!(!catalog.is_empty());
    for (bucket, subject) in catalog.iter() {
        let zeros: HashMap<String, f64> = subject.fields.iter().map(|f| (f.id.clone(), 0.0)).collect();
        let raw = subject.evaluate(&zeros);
        assert!((-TOLERANCE..=100.0 + TOLERANCE).contains(&raw), "{bucket}/{}: {raw}", subject.key);

        let full: HashMap<String, f64> = subject
            .fields
            .iter()
            .map(|f| (f.id.clone(), if f.id == "Bonus" { 0.0 } else { f.max }))
            .collect();
        let raw = subject.evaluate(&full);
        assert!((-TOLERANCE..=100.0 + TOLERANCE).contains(&raw), "{bucket}/{}: {raw}", subject.key);
    }
}

#[test]
fn classification_is_monotone() {
    let mut previous = grading::classify(0.0);
    for step in 1..=10_000 {
        let score = f64::from(step) / 100.0;
        let current = grading::classify(score);
        assert!(current.points >= previous.points, "{score}");
        assert!(current.letter.threshold() >= previous.letter.threshold(), "{score}");
        previous = current;
    }
}

#[test]
fn classification_boundaries_are_inclusive() {
    for grade in LetterGrade::PASSING {
        let at = grading::classify(grade.threshold());
        assert_eq!(at.letter, grade);
        let below = grading::classify(grade.threshold() - 0.01);
        assert_ne!(below.letter, grade);
    }
    assert_eq!(grading::classify(39.99).letter, LetterGrade::U);
    assert_eq!(grading::classify(150.0).score, 100.0);
    assert_eq!(grading::classify(-3.0).points, 0);
}

#[test]
fn predictions_round_trip_through_grading() {
    let catalog = Catalog::builtin();
    for (bucket, subject) in catalog.iter() {
        let Some(free) = subject.free() else {
            continue;
        };
        for share in [0.0, 0.35, 0.6, 0.9, 1.0] {
            let known = partial_values(subject, share);
            for target in LetterGrade::PASSING {
                let prediction = predictor::predict(subject, &known, target)
                    .unwrap_or_else(|e| panic!("{bucket}/{}: {e}", subject.key));
                let at = |x: f64| {
                    let mut values = known.clone();
                    values.insert(free.id.clone(), x);
                    grading::grade(subject, &values)
                };
                let label = format!("{bucket}/{} {target} at {share}", subject.key);
                match prediction.status {
                    PredictionStatus::Achievable => {
                        let required = prediction.required.expect("achievable has a value");
                        assert!(prediction.possible, "{label}");
                        assert!((free.min..=free.max).contains(&required), "{label}");
                        assert_eq!(at(required).letter, target, "{label}");
                        if required > free.min {
                            let below = (required - 0.01).max(free.min);
                            assert!(at(below).score < target.threshold(), "{label}");
                        }
                    }
                    PredictionStatus::AlreadySecured => {
                        assert!(at(free.min).score >= target.threshold(), "{label}");
                    }
                    PredictionStatus::Unattainable => {
                        assert!(at(free.max).score < target.threshold(), "{label}");
                    }
                }
                if !prediction.possible {
                    assert_eq!(prediction.required, None, "{label}");
                }
            }
        }
    }
}

#[test]
fn grading_and_prediction_are_idempotent() {
    let catalog = Catalog::builtin();
    for (_, subject) in catalog.iter() {
        let values = partial_values(subject, 0.7);
        assert_eq!(grading::grade(subject, &values), grading::grade(subject, &values));
        if subject.free().is_some() {
            assert_eq!(
                predictor::predict_all(subject, &values),
                predictor::predict_all(subject, &values)
            );
        }
    }
}

fn courses(grades: &[u8]) -> Vec<Course> {
    grades
        .iter()
        .zip(1..)
        .map(|(&g, id)| Course::new(id, format!("Course {id}"), 4.0, GradePoint::new(g).expect("valid")))
        .collect()
}

#[test]
fn zero_prior_cgpa_equals_semester_gpa() {
    let list = courses(&[10, 9, 7, 4, 0]);
    let summary = cgpa::summarize(&PriorRecord::default(), &list);
    assert!((summary.cumulative_cgpa - summary.semester_gpa).abs() < TOLERANCE);
    assert!((summary.semester_gpa - 6.0).abs() < TOLERANCE);
}

#[test]
fn histogram_counts_every_course() {
    let list = courses(&[10, 10, 9, 8, 7, 6, 5, 4, 0]);
    let summary = cgpa::summarize(&PriorRecord::default(), &list);
    let dist = summary.distribution;
    assert_eq!(dist.total(), list.len());
    assert_eq!((dist.s, dist.a, dist.b, dist.c, dist.others), (2, 1, 1, 1, 4));
}

#[test]
fn projection_without_future_credits_is_impossible() {
    let summary = cgpa::summarize(&PriorRecord::default(), &courses(&[8]));
    let projection = cgpa::project(&summary, 9.0, 0.0);
    assert_eq!(projection.required_gpa, None);
    assert!(!projection.possible);
}

#[test]
fn projection_outside_scale_is_impossible() {
    let summary = cgpa::summarize(&PriorRecord::default(), &courses(&[6, 6]));
    let too_high = cgpa::project(&summary, 9.5, 4.0);
    assert!(too_high.required_gpa.is_some_and(|gpa| gpa > 10.0));
    assert!(!too_high.possible);
    let reachable = cgpa::project(&summary, 7.0, 8.0);
    assert!(reachable.possible);
    assert!(reachable.required_gpa.is_some_and(|gpa| (gpa - 8.0).abs() < TOLERANCE));
}
