//! CLI argument definitions for `gradepoint`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gradepoint::config::ConfigOverrides;
use gradepoint::core::models::{CourseSpec, LetterGrade};
use gradepoint::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog`, `default_branch`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// List the subjects offered at a level for a branch.
    Subjects {
        /// Program level (foundation, diploma, degree); defaults to config
        #[arg(short, long, value_name = "LEVEL")]
        level: Option<String>,

        /// Branch (e.g., "Data Science", "Electronic Systems"); defaults to config
        #[arg(short, long, value_name = "BRANCH")]
        branch: Option<String>,

        /// Also print each subject's grading formula
        #[arg(long)]
        formulas: bool,
    },
    /// Compute the score, letter grade and grade points for a subject.
    Grade {
        /// Subject key (see `gradepoint subjects`)
        #[arg(value_name = "SUBJECT")]
        subject: String,

        /// Program level; defaults to config
        #[arg(short, long, value_name = "LEVEL")]
        level: Option<String>,

        /// Component score, repeatable (e.g., `-s Qz1=80 -s F=65`)
        #[arg(short = 's', long = "score", value_name = "FIELD=VALUE")]
        scores: Vec<String>,
    },
    /// Compute the end-term score needed for each target grade.
    Predict {
        /// Subject key (see `gradepoint subjects`)
        #[arg(value_name = "SUBJECT")]
        subject: String,

        /// Program level; defaults to config
        #[arg(short, long, value_name = "LEVEL")]
        level: Option<String>,

        /// Known component score, repeatable (e.g., `-s Qz1=80`)
        #[arg(short = 's', long = "score", value_name = "FIELD=VALUE")]
        scores: Vec<String>,

        /// Only predict this grade (S, A, B, C, D, E); all passing grades when omitted
        #[arg(short, long, value_name = "GRADE")]
        target: Option<LetterGrade>,
    },
    /// Compute semester GPA, cumulative CGPA and a target projection.
    Cgpa {
        /// CGPA before this term
        #[arg(long, value_name = "CGPA")]
        current_cgpa: Option<String>,

        /// Credits completed before this term
        #[arg(long, value_name = "CREDITS")]
        credits_completed: Option<String>,

        /// Subjects completed before this term
        #[arg(long, value_name = "COUNT")]
        subjects_completed: Option<String>,

        /// Course of this term as NAME:CREDITS:GRADE, repeatable (grade is a point or a letter)
        #[arg(short = 'c', long = "course", value_name = "NAME:CREDITS:GRADE")]
        courses: Vec<CourseSpec>,

        /// CGPA to aim for
        #[arg(long, value_name = "CGPA", requires = "future_credits")]
        target_cgpa: Option<f64>,

        /// Credits remaining to reach the target
        #[arg(long, value_name = "CREDITS", requires = "target_cgpa")]
        future_credits: Option<f64>,

        /// Write a report in the specified format (markdown, html)
        #[arg(long, value_name = "FORMAT")]
        report: Option<String>,

        /// Report output path (defaults to config `reports_dir`)
        #[arg(short, long, value_name = "FILE", requires = "report")]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradepoint",
    about = "IITM BS grade calculator, end-term predictor and CGPA planner",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Use this subject catalog instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Transforms CLI arguments into a `ConfigOverrides` struct that can be applied to
    /// the loaded configuration. `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            catalog_file: self
                .catalog
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            ..ConfigOverrides::default()
        }
    }
}
