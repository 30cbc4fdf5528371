//! Config command handler

use crate::args::ConfigSubcommand;
use gradepoint::config::Config;
use gradepoint::core::Catalog;
use gradepoint::{error, info};
use std::io::{self, Write};
use std::path::Path;

/// Keys accepted by `config get/set/unset`
const KEYS: [&str; 7] = [
    "level",
    "file",
    "verbose",
    "catalog",
    "default_level",
    "default_branch",
    "reports_dir",
];

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    let result = match subcommand {
        None => {
            handle_config_get(config, None);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key }) => {
            handle_config_get(config, key);
            Ok(())
        }
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    };

    if let Err(err) = result {
        error!("config command failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Handle the config get subcommand
pub fn handle_config_get(config: &Config, key: Option<String>) {
    if let Some(k) = key {
        match config.get(&k) {
            Some(value) => println!("{value}"),
            None => eprintln!(
                "Unknown config key: '{k}' (available: {})",
                KEYS.join(", ")
            ),
        }
    } else {
        println!("\n=== Configuration ===");
        println!("({})\n", Config::get_config_file_path().display());
        print!("{config}");
    }
}

/// Handle the config set subcommand
///
/// A catalog path is loaded and validated before it is stored.
///
/// # Errors
/// Returns a user-facing message if the key or value is rejected or the
/// config cannot be saved.
pub fn handle_config_set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    if matches!(key, "catalog" | "catalog_file" | "catalog-file") && !value.is_empty() {
        let catalog = Catalog::load(Path::new(value))
            .map_err(|e| format!("✗ Refusing to use catalog {value}: {e}"))?;
        info!("Validated catalog {value} ({} subjects)", catalog.len());
    }

    config.set(key, value).map_err(|e| format!("✗ {e}"))?;
    config
        .save()
        .map_err(|e| format!("✗ Failed to save config: {e}"))?;

    info!("Config key {key} set to {value}");
    println!("✓ Set {key} = {value}");
    Ok(())
}

/// Handle the config unset subcommand
///
/// # Errors
/// Returns a user-facing message if the key is unknown or the config cannot
/// be saved.
pub fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults).map_err(|e| format!("✗ {e}"))?;
    config
        .save()
        .map_err(|e| format!("✗ Failed to save config: {e}"))?;

    println!("✓ Reset {key} to default");
    Ok(())
}

/// Handle the config reset subcommand
///
/// # Errors
/// Returns a user-facing message if the config file cannot be removed.
pub fn handle_config_reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    let answer = response.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_is_readable() {
        let config = Config::from_defaults();
        for key in KEYS {
            assert!(config.get(key).is_some(), "{key}");
        }
    }
}
