//! Config command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use sheetmarks_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
///
/// The access token is never printed in full.
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "spreadsheet_id": config.spreadsheet_id,
                    "worksheet": config.worksheet,
                    "access_token": config.masked_access_token(),
                    "api_url": config.api_url,
                    "timeout_secs": config.timeout_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.spreadsheet_id.as_deref().unwrap_or(""));
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!(
                "  spreadsheet_id: {}",
                config.spreadsheet_id.as_deref().unwrap_or("(not set)")
            );
            println!("  worksheet:      {}", config.worksheet);
            println!(
                "  access_token:   {}",
                config
                    .masked_access_token()
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!("  api_url:        {}", config.api_url);
            println!("  timeout_secs:   {}", config.timeout_secs);
            println!(
                "  log_file:       {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);

    // Edit the file's own values; SHEETMARKS_* overrides stay out of it
    let mut config =
        Config::load_file_only(&save_path).context("Failed to load configuration")?;
    config.set_value(&key, &value)?;

    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    let shown = if key == "access_token" && !value.is_empty() && value != "none" {
        "(hidden)".to_string()
    } else {
        value
    };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}
