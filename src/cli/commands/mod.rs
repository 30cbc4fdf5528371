//! CLI command handlers for `gradepoint`.
//!
//! This module provides handlers for various CLI subcommands.
//! Each command is implemented in its own submodule.

pub mod cgpa;
pub mod config;
pub mod grade;
pub mod predict;
pub mod subjects;
