//! Configuration command handler

use anyhow::{Context, Result};
use colored::Colorize;

use crate::settings;

/// Handle `vector-sync config`
///
/// With `--show`, or without any setting to change, prints the current
/// configuration. Otherwise applies the given settings.
pub fn handle_config(
    show: bool,
    confirm_changes: Option<bool>,
    file_logging: Option<bool>,
) -> Result<()> {
    let has_updates = confirm_changes.is_some() || file_logging.is_some();

    if has_updates {
        settings::update_settings(confirm_changes, file_logging)
            .context("Failed to update configuration")?;
    }

    if show || !has_updates {
        if has_updates {
            println!();
        }
        settings::show_settings()?;
    }

    if !has_updates && !show {
        println!();
        println!(
            "{}",
            "Use --confirm-changes or --file-logging to change a setting.".dimmed()
        );
    }

    Ok(())
}
