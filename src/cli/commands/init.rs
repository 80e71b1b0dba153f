//! Init and Config commands.

use crate::config::Settings;
use crate::error::{RagError, Result};

/// Create the default configuration file.
pub fn run_init(force: bool) -> Result<()> {
    let path = Settings::init_config_file(force)?;
    println!("Created configuration file at: {}", path.display());
    println!("Edit this file to customize your settings.");
    Ok(())
}

/// Display the active configuration as TOML.
pub fn run_config(settings: &Settings) -> Result<()> {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    let toml_str =
        toml::to_string_pretty(settings).map_err(|e| RagError::Config(e.to_string()))?;
    println!("{toml_str}");
    Ok(())
}
