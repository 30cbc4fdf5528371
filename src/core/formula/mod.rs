//! Grading formulas as data
//!
//! Every subject's grading rule is an [`Expr`] tree built from constants,
//! field references, sums, products, and `max`/`min`/`avg` over
//! sub-expressions. One evaluator and one inverter interpret every subject,
//! so the catalog is the only place a formula is written down.

pub mod linear;
pub mod parser;

pub use linear::Affine;
pub use parser::{parse, FormulaError};

use std::collections::HashMap;
use std::fmt;

/// A grading formula expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Const(f64),
    /// Raw value of a scoring field; missing values read as 0
    Field(String),
    /// Sum of terms
    Sum(Vec<Expr>),
    /// Product of factors (a weight times a component)
    Product(Vec<Expr>),
    /// Largest of the arguments
    Max(Vec<Expr>),
    /// Smallest of the arguments
    Min(Vec<Expr>),
    /// Arithmetic mean of the arguments
    Avg(Vec<Expr>),
}

impl Expr {
    /// Evaluate with the given field values
    #[must_use]
    pub fn eval(&self, values: &HashMap<String, f64>) -> f64 {
        match self {
            Self::Const(c) => *c,
            Self::Field(id) => values.get(id).copied().unwrap_or(0.0),
            Self::Sum(terms) => terms.iter().map(|t| t.eval(values)).sum(),
            Self::Product(factors) => factors.iter().map(|t| t.eval(values)).product(),
            Self::Max(args) => args
                .iter()
                .map(|t| t.eval(values))
                .fold(f64::NEG_INFINITY, f64::max),
            Self::Min(args) => args
                .iter()
                .map(|t| t.eval(values))
                .fold(f64::INFINITY, f64::min),
            Self::Avg(args) => {
                if args.is_empty() {
                    0.0
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    let n = args.len() as f64;
                    args.iter().map(|t| t.eval(values)).sum::<f64>() / n
                }
            }
        }
    }

    /// Evaluate with `free` overridden to `x`
    #[must_use]
    pub fn eval_with(&self, values: &HashMap<String, f64>, free: &str, x: f64) -> f64 {
        let mut values = values.clone();
        values.insert(free.to_string(), x);
        self.eval(&values)
    }

    /// Distinct field ids referenced, in first-use order
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<String>) {
        match self {
            Self::Const(_) => {}
            Self::Field(id) => {
                if !out.contains(id) {
                    out.push(id.clone());
                }
            }
            Self::Sum(xs) | Self::Product(xs) | Self::Max(xs) | Self::Min(xs) | Self::Avg(xs) => {
                for x in xs {
                    x.collect_fields(out);
                }
            }
        }
    }

    /// Whether the expression references field `id`
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        match self {
            Self::Const(_) => false,
            Self::Field(f) => f == id,
            Self::Sum(xs) | Self::Product(xs) | Self::Max(xs) | Self::Min(xs) | Self::Avg(xs) => {
                xs.iter().any(|x| x.contains(id))
            }
        }
    }

    /// Whether the expression references no field at all
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Const(_) => true,
            Self::Field(_) => false,
            Self::Sum(xs) | Self::Product(xs) | Self::Max(xs) | Self::Min(xs) | Self::Avg(xs) => {
                xs.iter().all(Self::is_constant)
            }
        }
    }

    /// Whether every product has at most one non-constant factor
    ///
    /// Catalog formulas are weighted combinations: weights are constants and
    /// never multiply two scoring fields together.
    #[must_use]
    pub fn is_weighted_linear(&self) -> bool {
        match self {
            Self::Const(_) | Self::Field(_) => true,
            Self::Product(factors) => {
                factors.iter().filter(|f| !f.is_constant()).count() <= 1
                    && factors.iter().all(Self::is_weighted_linear)
            }
            Self::Sum(xs) | Self::Max(xs) | Self::Min(xs) | Self::Avg(xs) => {
                xs.iter().all(Self::is_weighted_linear)
            }
        }
    }

    /// Whether the value never decreases as `free` grows, other fields fixed at `values`
    ///
    /// Sums, `max`, `min` and `avg` preserve monotonicity; a product does when
    /// `free` appears in a single factor and the remaining factors multiply to a
    /// non-negative number.
    #[must_use]
    pub fn is_monotone_in(&self, free: &str, values: &HashMap<String, f64>) -> bool {
        if !self.contains(free) {
            return true;
        }
        match self {
            Self::Const(_) | Self::Field(_) => true,
            Self::Sum(xs) | Self::Max(xs) | Self::Min(xs) | Self::Avg(xs) => {
                xs.iter().all(|x| x.is_monotone_in(free, values))
            }
            Self::Product(factors) => {
                let (with_free, rest): (Vec<&Self>, Vec<&Self>) =
                    factors.iter().partition(|f| f.contains(free));
                if with_free.len() != 1 {
                    return false;
                }
                let scale: f64 = rest.iter().map(|f| f.eval(values)).product();
                scale >= 0.0 && with_free[0].is_monotone_in(free, values)
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, args: &[Expr]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "{c}"),
            Self::Field(id) => f.write_str(id),
            Self::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{term}")?;
                }
                Ok(())
            }
            Self::Product(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("*")?;
                    }
                    if matches!(factor, Self::Sum(_)) {
                        write!(f, "({factor})")?;
                    } else {
                        write!(f, "{factor}")?;
                    }
                }
                Ok(())
            }
            Self::Max(args) => write_list(f, "max", args),
            Self::Min(args) => write_list(f, "min", args),
            Self::Avg(args) => write_list(f, "avg", args),
        }
    }
}
