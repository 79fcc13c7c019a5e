use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User settings, stored as `config.toml` in the config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Ask before a sync adds, deletes or overwrites files
    #[serde(default = "default_true")]
    pub confirm_changes: bool,

    /// Append a line per command to the log file in the config directory
    #[serde(default = "default_true")]
    pub file_logging: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            confirm_changes: true,
            file_logging: true,
        }
    }
}

impl Settings {
    /// Load settings from the config directory, or defaults if none are saved
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn settings_path() -> Result<PathBuf> {
        crate::config::ConfigManager::settings_path()
    }
}

/// Update the saved settings
pub fn update_settings(confirm_changes: Option<bool>, file_logging: Option<bool>) -> Result<()> {
    let mut settings = Settings::load()?;

    if let Some(confirm) = confirm_changes {
        settings.confirm_changes = confirm;
        println!("{}", format!("Set confirm_changes to {confirm}").green());
    }

    if let Some(logging) = file_logging {
        settings.file_logging = logging;
        println!("{}", format!("Set file_logging to {logging}").green());
    }

    settings.save()?;
    println!("{}", "Configuration saved".green().bold());

    Ok(())
}

/// Print the current settings
pub fn show_settings() -> Result<()> {
    let settings = Settings::load()?;

    println!("{}", "Current configuration:".bold().cyan());
    println!(
        "  {} {}",
        "Config file:".bold(),
        Settings::settings_path()?.display()
    );
    println!("  {} {}", "confirm_changes:".bold(), settings.confirm_changes);
    println!("  {} {}", "file_logging:".bold(), settings.file_logging);

    Ok(())
}
