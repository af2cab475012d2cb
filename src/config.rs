//! Configuration system
//!
//! Loads configuration from a TOML file at `~/.config/driftwm/config.toml`,
//! once at startup. Every option is required; a missing or malformed file
//! is startup-fatal.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Sentinel wallpaper value meaning "do not set one".
pub const NO_WALLPAPER: &str = "none";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub theme: ThemeConfig,
    pub options: OptionsConfig,
    pub defaults: DefaultsConfig,
}

/// Border and wallpaper theming
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThemeConfig {
    /// Border color for unfocused windows (0xRRGGBB)
    pub inactive_window_color: u32,
    /// Border color for the active window (0xRRGGBB)
    pub active_window_color: u32,
    /// Wallpaper image path, or `"none"`
    pub wallpaper: String,
    /// Border width in pixels
    pub border_size: u32,
}

/// Startup behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionsConfig {
    /// Script run once at startup
    pub startup_script_path: String,
    /// Interpreter used to run the startup script
    pub startup_script_command: String,
    /// Keyboard layout name passed to setxkbmap
    pub keymap: String,
}

/// Default applications
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefaultsConfig {
    pub browser: String,
    pub terminal: String,
}

impl Config {
    /// Load configuration from file. Treated as immutable for the process
    /// lifetime once loaded.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::Missing(path.clone())
            } else {
                ConfigError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        info!("Configuration loaded from {:?}", path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("driftwm");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_file() {
        let config: Config = toml::from_str(
            r#"
            [theme]
            inactive-window-color = 0x3b4252
            active-window-color = 0x5e81ac
            wallpaper = "none"
            border-size = 2

            [options]
            startup-script-path = "/home/user/.config/driftwm/startup.sh"
            startup-script-command = "sh"
            keymap = "us"

            [defaults]
            browser = "firefox"
            terminal = "xterm"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.theme.active_window_color, 0x5e81ac);
        assert_eq!(config.theme.border_size, 2);
        assert_eq!(config.theme.wallpaper, NO_WALLPAPER);
        assert_eq!(config.options.keymap, "us");
        assert_eq!(config.defaults.terminal, "xterm");
    }

    #[test]
    fn missing_required_option_is_an_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [theme]
            inactive-window-color = 0x3b4252
            active-window-color = 0x5e81ac
            wallpaper = "none"
            border-size = 2

            [options]
            startup-script-path = "/tmp/startup.sh"
            startup-script-command = "sh"

            [defaults]
            browser = "firefox"
            terminal = "xterm"
            "#,
        );
        assert!(result.is_err(), "keymap is required");
    }
}
