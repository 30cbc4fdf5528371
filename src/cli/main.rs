//! Command-line interface entry point for `gradepoint`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use commands::cgpa::{PriorArgs, ReportRequest};
use gradepoint::config::Config;
use gradepoint::core::{Catalog, Engine};
use gradepoint::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use gradepoint::{error, info};
use std::path::{Path, PathBuf};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Into::into)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Subjects {
            level,
            branch,
            formulas,
        } => {
            let catalog = load_catalog(&config);
            let level = level.unwrap_or_else(|| config.defaults.level.clone());
            let branch = branch.unwrap_or_else(|| config.defaults.branch.clone());
            commands::subjects::run(&catalog, &level, &branch, formulas);
        }
        Command::Grade {
            subject,
            level,
            scores,
        } => {
            let catalog = load_catalog(&config);
            let engine = Engine::new(&catalog);
            let level = level.unwrap_or_else(|| config.defaults.level.clone());
            commands::grade::run(&engine, &level, &subject, &scores);
        }
        Command::Predict {
            subject,
            level,
            scores,
            target,
        } => {
            let catalog = load_catalog(&config);
            let engine = Engine::new(&catalog);
            let level = level.unwrap_or_else(|| config.defaults.level.clone());
            commands::predict::run(&engine, &level, &subject, &scores, target);
        }
        Command::Cgpa {
            current_cgpa,
            credits_completed,
            subjects_completed,
            courses,
            target_cgpa,
            future_credits,
            report,
            output,
        } => {
            let prior = PriorArgs {
                cgpa: current_cgpa,
                credits: credits_completed,
                subjects: subjects_completed,
            };
            let target = target_cgpa.zip(future_credits);
            let request = report.as_deref().map(|format| ReportRequest {
                format,
                output,
                reports_dir: &config.paths.reports_dir,
            });
            commands::cgpa::run(&prior, &courses, target, request);
        }
    }
}

/// Load the configured catalog, or the built-in one when none is set
fn load_catalog(config: &Config) -> Catalog {
    if config.catalog.file.is_empty() {
        return Catalog::builtin();
    }
    match Catalog::load(Path::new(&config.catalog.file)) {
        Ok(catalog) => {
            info!(
                "Loaded catalog {} ({} subjects)",
                config.catalog.file,
                catalog.len()
            );
            catalog
        }
        Err(e) => {
            error!("Failed to load catalog {}: {e}", config.catalog.file);
            eprintln!("✗ Failed to load catalog {}: {e}", config.catalog.file);
            std::process::exit(1);
        }
    }
}
