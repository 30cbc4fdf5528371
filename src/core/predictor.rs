//! Inverse solver: the end-term score needed for a target grade
//!
//! With every other component fixed, a formula is usually the maximum of a
//! few affine functions of the free component. The solver inverts each
//! increasing arm and keeps the smallest solution, then checks the answer
//! against the full formula. Formulas that do not decompose this way (a
//! bonus cap wrapped around the free component, say) are solved by bisection
//! once they are known to be non-decreasing in it.

use crate::core::error::EngineError;
use crate::core::grading::{classify, round2};
use crate::core::models::{LetterGrade, PredictionResult, PredictionStatus, Subject};
use crate::debug;
use std::collections::HashMap;

/// Slopes smaller than this are treated as flat
const SLOPE_EPSILON: f64 = 1e-12;

/// Allowed mismatch between an arm's inverse and the full formula
const VERIFY_TOLERANCE: f64 = 1e-6;

/// Width at which bisection stops
const BISECTION_TOLERANCE: f64 = 1e-6;

/// How a crossing point was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Inverted the affine arm at this index, counted across the flattened `max`
    Analytic {
        /// Index of the binding arm
        arm: usize,
    },
    /// The formula does not depend on the free component
    Constant,
    /// Numeric search over the free component's bounds
    Bisection,
}

/// Smallest free-component value at which the formula reaches a threshold
///
/// `value` is `-inf` when the threshold is met for every value and `+inf`
/// when no value reaches it. Analytic solutions may lie outside the free
/// component's bounds; that is how "already secured" and "unattainable"
/// are told apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Crossing point
    pub value: f64,
    /// How it was found
    pub method: Method,
}

/// Find where `subject` reaches `threshold` as its free component grows
///
/// # Errors
/// Returns [`EngineError::NoFreeField`] when the subject has no free
/// component and [`EngineError::NotMonotone`] when the formula can decrease
/// as it grows.
pub fn solve(
    subject: &Subject,
    values: &HashMap<String, f64>,
    threshold: f64,
) -> Result<Solution, EngineError> {
    let free = subject
        .free()
        .ok_or_else(|| EngineError::NoFreeField(subject.key.clone()))?;
    let formula = &subject.formula;
    let at = |x: f64| formula.eval_with(values, &free.id, x);

    if let Some(arms) = formula.linear_arms(&free.id, values) {
        if arms.iter().all(|arm| arm.slope > -SLOPE_EPSILON) {
            if arms
                .iter()
                .any(|arm| arm.slope.abs() <= SLOPE_EPSILON && arm.intercept >= threshold)
            {
                return Ok(Solution {
                    value: f64::NEG_INFINITY,
                    method: Method::Constant,
                });
            }

            let increasing: Vec<(usize, f64)> = arms
                .iter()
                .enumerate()
                .filter(|(_, arm)| arm.slope > SLOPE_EPSILON)
                .map(|(i, arm)| (i, (threshold - arm.intercept) / arm.slope))
                .collect();

            let Some(&(arm, value)) = increasing
                .iter()
                .min_by(|a, b| a.1.total_cmp(&b.1))
            else {
                return Ok(Solution {
                    value: f64::INFINITY,
                    method: Method::Constant,
                });
            };

            if increasing.len() > 1 {
                debug!(
                    "{}: {} arms increase in {}; arm {} binds at {:.4}",
                    subject.key,
                    increasing.len(),
                    free.id,
                    arm,
                    value
                );
            }

            if (at(value) - threshold).abs() <= VERIFY_TOLERANCE * threshold.abs().max(1.0) {
                return Ok(Solution {
                    value,
                    method: Method::Analytic { arm },
                });
            }
            debug!(
                "{}: arm {} solution {:.4} failed verification, falling back to bisection",
                subject.key,
                arm,
                value
            );
        }
    }

    if !formula.is_monotone_in(&free.id, values) {
        return Err(EngineError::NotMonotone(subject.key.clone()));
    }
    debug!("{}: solving for {} by bisection", subject.key, free.id);

    let (mut lo, mut hi) = (free.min, free.max);
    if at(lo) >= threshold {
        // Reached at the lower bound: exactly there, or already with room to spare
        let value = if at(lo) - threshold <= VERIFY_TOLERANCE {
            lo
        } else {
            f64::NEG_INFINITY
        };
        return Ok(Solution {
            value,
            method: Method::Bisection,
        });
    }
    if at(hi) < threshold {
        return Ok(Solution {
            value: f64::INFINITY,
            method: Method::Bisection,
        });
    }
    while hi - lo > BISECTION_TOLERANCE {
        let mid = lo + (hi - lo) / 2.0;
        if at(mid) >= threshold {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(Solution {
        value: hi,
        method: Method::Bisection,
    })
}

/// Round up to 2 decimal places, ignoring float noise just above a boundary
fn ceil2(x: f64) -> f64 {
    (x.mul_add(100.0, -1e-7)).ceil() / 100.0
}

/// Lowest distance below a cutoff that still rounds onto it
const HALF_CENT: f64 = 0.005;

/// Score needed on the free component to reach `target`
///
/// The free component's entry in `values` is ignored. Outcomes are judged
/// on the rounded score the grader reports, so the solver aims half a cent
/// below the cutoff. `required` is `None` unless the answer lies within the
/// component's bounds; it is rounded up to 2 decimal places and stepped up
/// until grading exactly `required` earns the target.
///
/// # Errors
/// See [`solve`].
pub fn predict(
    subject: &Subject,
    values: &HashMap<String, f64>,
    target: LetterGrade,
) -> Result<PredictionResult, EngineError> {
    let free = subject
        .free()
        .ok_or_else(|| EngineError::NoFreeField(subject.key.clone()))?;
    let solution = solve(subject, values, target.threshold() - HALF_CENT)?;
    let raw_at = |x: f64| subject.formula.eval_with(values, &free.id, x);
    let final_at = |x: f64| round2(raw_at(x).clamp(0.0, 100.0));
    let meets = |x: f64| classify(raw_at(x)).score >= target.threshold();

    let result = if solution.value < free.min && meets(free.min) {
        PredictionResult {
            target,
            required: None,
            possible: false,
            final_grade: final_at(free.min),
            status: PredictionStatus::AlreadySecured,
        }
    } else if solution.value > free.max || !meets(free.max) {
        PredictionResult {
            target,
            required: None,
            possible: false,
            final_grade: final_at(free.max),
            status: PredictionStatus::Unattainable,
        }
    } else {
        let mut required = ceil2(solution.value.max(free.min)).clamp(free.min, free.max);
        while !meets(required) && required < free.max {
            required = round2(required + 0.01).min(free.max);
        }
        PredictionResult {
            target,
            required: Some(required),
            possible: true,
            final_grade: final_at(required),
            status: PredictionStatus::Achievable,
        }
    };
    Ok(result)
}

/// Independent predictions for every passing grade, best first
///
/// # Errors
/// See [`solve`].
pub fn predict_all(
    subject: &Subject,
    values: &HashMap<String, f64>,
) -> Result<Vec<PredictionResult>, EngineError> {
    LetterGrade::PASSING
        .into_iter()
        .map(|target| predict(subject, values, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formula::parse;
    use crate::core::grading::grade;
    use crate::core::models::SubjectField;

    fn subject(formula: &str, ids: &[&str]) -> Subject {
        let mut fields: Vec<SubjectField> = ids.iter().map(|id| SubjectField::new(id, id)).collect();
        if let Some(bonus) = fields.iter_mut().find(|f| f.id == "Bonus") {
            bonus.max = 5.0;
        }
        Subject {
            key: "test".to_string(),
            name: "Test".to_string(),
            credits: 4.0,
            fields,
            formula: parse(formula).expect("parse"),
            free_field: Some("F".to_string()),
        }
    }

    fn values(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    fn maths1() -> Subject {
        subject(
            "max(0.6*F + 0.3*max(Qz1, Qz2), 0.45*F + 0.25*Qz1 + 0.3*Qz2)",
            &["Qz1", "Qz2", "F"],
        )
    }

    #[test]
    fn straight_sum_inverts_exactly() {
        let s = subject("0.4*Qz1 + 0.6*F", &["Qz1", "F"]);
        let p = predict(&s, &values(&[("Qz1", 50.0)]), LetterGrade::B).expect("predict");
        // 20 + 0.6F = 69.995 → F = 83.325, rounded up; 69.998 grades as 70
        assert_eq!(p.required, Some(83.33));
        assert!(p.possible);
        assert_eq!(p.status, PredictionStatus::Achievable);
        assert!(p.final_grade >= 70.0);
    }

    #[test]
    fn binding_arm_is_the_smallest_solution() {
        let s = maths1();
        let v = values(&[("Qz1", 60.0), ("Qz2", 60.0)]);
        // arm 0: 18 + 0.6F, arm 1: 33 + 0.45F; for 90 arm 0 gives 120, arm 1 gives 126.67
        let solution = solve(&s, &v, 90.0).expect("solve");
        assert_eq!(solution.method, Method::Analytic { arm: 0 });
        assert!((solution.value - 120.0).abs() < 1e-9);

        // for 40 arm 1 binds: (40 - 33) / 0.45 = 15.56 < (40 - 18) / 0.6 = 36.67
        let solution = solve(&s, &v, 40.0).expect("solve");
        assert_eq!(solution.method, Method::Analytic { arm: 1 });
    }

    #[test]
    fn unreachable_target_is_unattainable() {
        let p = predict(&maths1(), &values(&[("Qz1", 60.0), ("Qz2", 60.0)]), LetterGrade::S)
            .expect("predict");
        assert!(!p.possible);
        assert_eq!(p.required, None);
        assert_eq!(p.status, PredictionStatus::Unattainable);
        // best reachable: max(18 + 60, 33 + 45) = 78
        assert!((p.final_grade - 78.0).abs() < 1e-9);
    }

    #[test]
    fn met_target_is_already_secured() {
        let s = subject("0.5*Qz1 + 0.5*F", &["Qz1", "F"]);
        let p = predict(&s, &values(&[("Qz1", 100.0)]), LetterGrade::E).expect("predict");
        assert!(!p.possible);
        assert_eq!(p.status, PredictionStatus::AlreadySecured);
        assert!((p.final_grade - 50.0).abs() < 1e-9);
    }

    #[test]
    fn score_that_rounds_onto_cutoff_is_reachable() {
        let s = maths1();
        let v = values(&[("Qz1", 0.0), ("Qz2", 99.987)]);
        // 0.6 * 100 + 29.9961 = 89.9961, graded as 90.00
        let mut full = v.clone();
        full.insert("F".to_string(), 100.0);
        assert_eq!(grade(&s, &full).letter, LetterGrade::S);

        let p = predict(&s, &v, LetterGrade::S).expect("predict");
        assert!(p.possible);
        assert_eq!(p.status, PredictionStatus::Achievable);
        assert_eq!(p.required, Some(100.0));
        assert!((p.final_grade - 90.0).abs() < 1e-9);
    }

    #[test]
    fn score_that_rounds_onto_cutoff_is_already_secured() {
        let s = subject(
            "0.1*GAA + max(0.6*F + 0.3*max(Qz1, Qz2), 0.45*F + 0.25*Qz1 + 0.2*Qz2)",
            &["GAA", "Qz1", "Qz2", "F"],
        );
        let v = values(&[("GAA", 0.0), ("Qz1", 88.88), ("Qz2", 88.88)]);
        // 0.45 * 88.88 = 39.996 with F = 0, graded as 40.00
        let mut zero = v.clone();
        zero.insert("F".to_string(), 0.0);
        assert_eq!(grade(&s, &zero).letter, LetterGrade::E);

        let p = predict(&s, &v, LetterGrade::E).expect("predict");
        assert_eq!(p.status, PredictionStatus::AlreadySecured);
        assert_eq!(p.required, None);
        assert!((p.final_grade - 40.0).abs() < 1e-9);
    }

    #[test]
    fn ignores_given_free_value() {
        let s = subject("0.4*Qz1 + 0.6*F", &["Qz1", "F"]);
        let with = predict(&s, &values(&[("Qz1", 50.0), ("F", 100.0)]), LetterGrade::A);
        let without = predict(&s, &values(&[("Qz1", 50.0)]), LetterGrade::A);
        assert_eq!(with, without);
    }

    #[test]
    fn capped_bonus_falls_back_to_bisection() {
        let s = subject("min(100, 0.3*Qz1 + 0.7*F + Bonus)", &["Qz1", "F", "Bonus"]);
        let v = values(&[("Qz1", 80.0), ("Bonus", 5.0)]);
        let solution = solve(&s, &v, 80.0).expect("solve");
        assert_eq!(solution.method, Method::Bisection);
        // 24 + 5 + 0.7F = 80 → F = 72.857...
        assert!((solution.value - 72.857_142_857).abs() < 1e-5);

        let p = predict(&s, &v, LetterGrade::A).expect("predict");
        let mut check = v.clone();
        check.insert("F".to_string(), p.required.expect("possible"));
        assert_eq!(grade(&s, &check).letter, LetterGrade::A);
    }

    #[test]
    fn decreasing_formula_is_rejected() {
        let s = subject("100 - 0.5*F + 0*Qz1", &["Qz1", "F"]);
        assert_eq!(
            solve(&s, &HashMap::new(), 90.0),
            Err(EngineError::NotMonotone("test".to_string()))
        );
    }

    #[test]
    fn subject_without_free_field_is_an_error() {
        let mut s = subject("0.6*GLA + 0.4*LE", &["GLA", "LE"]);
        s.free_field = None;
        assert_eq!(
            predict(&s, &HashMap::new(), LetterGrade::S),
            Err(EngineError::NoFreeField("test".to_string()))
        );
    }

    #[test]
    fn predict_all_covers_passing_grades_independently() {
        let all = predict_all(&maths1(), &values(&[("Qz1", 60.0), ("Qz2", 60.0)])).expect("all");
        let targets: Vec<LetterGrade> = all.iter().map(|p| p.target).collect();
        assert_eq!(targets, LetterGrade::PASSING.to_vec());
        let required: Vec<Option<f64>> = all.iter().map(|p| p.required).collect();
        for pair in required.windows(2) {
            if let (Some(hi), Some(lo)) = (pair[0], pair[1]) {
                assert!(hi >= lo);
            }
        }
    }
}
