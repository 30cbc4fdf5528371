//! Grade evaluation engine: catalog, formulas, grading, prediction and CGPA

pub mod catalog;
pub mod cgpa;
pub mod config;
pub mod engine;
pub mod error;
pub mod formula;
pub mod grading;
pub mod input;
pub mod models;
pub mod predictor;
pub mod report;

pub use catalog::{Catalog, CatalogError};
pub use engine::Engine;
pub use error::EngineError;

/// Returns the current version of the `gradepoint` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
