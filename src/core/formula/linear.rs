//! Piecewise-linear view of a formula in one free variable
//!
//! With every other field fixed, most grading formulas reduce to the maximum of
//! a few affine functions `a + b·x` of the free variable. This module performs
//! that reduction so the predictor can invert each arm algebraically.

use super::Expr;
use std::collections::HashMap;

/// Upper bound on arms produced by distributing sums over `max`
const MAX_ARMS: usize = 64;

/// Affine function `intercept + slope·x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    /// Value at `x = 0`
    pub intercept: f64,
    /// Change per unit of `x`
    pub slope: f64,
}

impl Affine {
    const fn constant(value: f64) -> Self {
        Self {
            intercept: value,
            slope: 0.0,
        }
    }

    /// Value at `x`
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }

    fn scale(self, k: f64) -> Self {
        Self {
            intercept: self.intercept * k,
            slope: self.slope * k,
        }
    }

    fn add(self, other: Self) -> Self {
        Self {
            intercept: self.intercept + other.intercept,
            slope: self.slope + other.slope,
        }
    }
}

impl Expr {
    /// Reduce to `max` of affine arms in `free`, other fields fixed at `values`
    ///
    /// Returns `None` when the structure is not a maximum of affine pieces: the
    /// free variable under `min`, under a negatively weighted `max`, inside a
    /// product with another variable factor, or too many arms after
    /// distributing sums over `max`.
    #[must_use]
    pub fn linear_arms(&self, free: &str, values: &HashMap<String, f64>) -> Option<Vec<Affine>> {
        if !self.contains(free) {
            return Some(vec![Affine::constant(self.eval(values))]);
        }
        match self {
            Self::Const(c) => Some(vec![Affine::constant(*c)]),
            Self::Field(_) => Some(vec![Affine {
                intercept: 0.0,
                slope: 1.0,
            }]),
            Self::Sum(terms) => sum_arms(terms, free, values),
            Self::Avg(args) => {
                #[allow(clippy::cast_precision_loss)]
                let n = args.len() as f64;
                sum_arms(args, free, values)
                    .map(|arms| arms.into_iter().map(|a| a.scale(1.0 / n)).collect())
            }
            Self::Max(args) => {
                let mut arms = Vec::new();
                for arg in args {
                    arms.extend(arg.linear_arms(free, values)?);
                }
                (arms.len() <= MAX_ARMS).then_some(arms)
            }
            Self::Product(factors) => {
                let (with_free, rest): (Vec<&Self>, Vec<&Self>) =
                    factors.iter().partition(|f| f.contains(free));
                if with_free.len() != 1 {
                    return None;
                }
                let k: f64 = rest.iter().map(|f| f.eval(values)).product();
                let arms = with_free[0].linear_arms(free, values)?;
                // a negative weight turns max into min
                if k < 0.0 && arms.len() > 1 {
                    return None;
                }
                Some(arms.into_iter().map(|a| a.scale(k)).collect())
            }
            Self::Min(_) => None,
        }
    }
}

/// Sum of maxima is the maximum over every combination of arms
fn sum_arms(terms: &[Expr], free: &str, values: &HashMap<String, f64>) -> Option<Vec<Affine>> {
    let mut acc = vec![Affine::constant(0.0)];
    for term in terms {
        let arms = term.linear_arms(free, values)?;
        if acc.len() * arms.len() > MAX_ARMS {
            return None;
        }
        acc = acc
            .iter()
            .flat_map(|a| arms.iter().map(move |b| a.add(*b)))
            .collect();
    }
    Some(acc)
}
