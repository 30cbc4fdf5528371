//! Shared library for `gradepoint`
//! Grade calculation, end-term prediction and CGPA projection for the IITM BS program

pub mod core;
pub mod logger;

pub use crate::core::config;
pub use crate::core::get_version;
