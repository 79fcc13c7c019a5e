use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "vector-sync";

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path following platform conventions:
    /// - Linux: $XDG_CONFIG_HOME/vector-sync or ~/.config/vector-sync
    /// - macOS: ~/Library/Application Support/vector-sync
    /// - Windows: %APPDATA%\vector-sync
    pub fn config_dir() -> Result<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            // XDG Base Directory: only an absolute XDG_CONFIG_HOME counts
            match xdg_config_home() {
                Some(xdg_config) => Ok(xdg_config.join(APP_DIR)),
                None => {
                    let home = dirs::home_dir().context("Failed to get home directory")?;
                    Ok(home.join(".config").join(APP_DIR))
                }
            }
        }

        #[cfg(target_os = "macos")]
        {
            // Follow macOS conventions
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join("Library").join("Application Support").join(APP_DIR))
        }

        #[cfg(target_os = "windows")]
        {
            // Use Windows APPDATA
            Ok(dirs::config_dir()
                .context("Failed to get Windows config directory")?
                .join(APP_DIR))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            // Fallback for other platforms
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join(".vector-sync-config"))
        }
    }

    /// Get the settings file path (config.toml)
    pub fn settings_path() -> Result<PathBuf> {
        Self::file("config.toml")
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Self::file("vector-sync.log")
    }

    fn file(name: &str) -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(name))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}

/// `$XDG_CONFIG_HOME` if it is set to an absolute path
#[cfg(target_os = "linux")]
fn xdg_config_home() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_paths() {
        let config_dir = ConfigManager::config_dir().unwrap();
        assert!(config_dir.to_string_lossy().contains("vector-sync"));

        let settings = ConfigManager::settings_path().unwrap();
        assert!(settings.to_string_lossy().ends_with("config.toml"));

        let log = ConfigManager::log_file_path().unwrap();
        assert!(log.to_string_lossy().ends_with("vector-sync.log"));
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_xdg_config_home_respected() {
        let temp = tempfile::TempDir::new().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", temp.path());

        let config_dir = ConfigManager::config_dir().unwrap();
        assert_eq!(config_dir, temp.path().join("vector-sync"));

        let ensured = ConfigManager::ensure_config_dir().unwrap();
        assert!(ensured.is_dir());

        std::env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_empty_or_relative_xdg_config_home_ignored() {
        for value in ["", "relative/dir"] {
            std::env::set_var("XDG_CONFIG_HOME", value);
            let config_dir = ConfigManager::config_dir().unwrap();
            assert!(config_dir.is_absolute());
            assert!(config_dir.ends_with(".config/vector-sync"));
        }
        std::env::remove_var("XDG_CONFIG_HOME");
    }
}
