use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable that overrides the base directory.
pub const HOME_ENV: &str = "GASTOMETRO_HOME";

/// Keys accepted by [`Config::set`].
pub const SETTABLE_KEYS: [&str; 5] = [
    "locale",
    "top_expenses",
    "chart_height",
    "ui_color_enabled",
    "data_root",
];

/// Preferences of the command-line frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    /// How many entries the "top expenses" list shows.
    #[serde(default = "Config::default_top_expenses")]
    pub top_expenses: usize,
    /// Height, in terminal rows, of the tallest monthly bar.
    #[serde(default = "Config::default_chart_height")]
    pub chart_height: u16,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// User id restored by the shell on start-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom directory for expense data. Defaults to `<base>/data`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            top_expenses: Self::default_top_expenses(),
            chart_height: Self::default_chart_height(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_user: None,
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "pt-BR".into()
    }

    pub fn default_top_expenses() -> usize {
        5
    }

    pub fn default_chart_height() -> u16 {
        8
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| base.join("data"))
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidSetting {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" => {
                if value.is_empty() {
                    return Err(invalid("locale cannot be empty"));
                }
                self.locale = value.to_string();
            }
            "top_expenses" => {
                let parsed: usize = value.parse().map_err(|_| invalid("expected a whole number"))?;
                if parsed == 0 {
                    return Err(invalid("must be at least 1"));
                }
                self.top_expenses = parsed;
            }
            "chart_height" => {
                let parsed: u16 = value.parse().map_err(|_| invalid("expected a whole number"))?;
                if !(2..=40).contains(&parsed) {
                    return Err(invalid("must be between 2 and 40"));
                }
                self.chart_height = parsed;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid("expected on/off")),
                };
            }
            "data_root" => {
                self.data_root = (!value.is_empty() && value != "default").then(|| PathBuf::from(value));
            }
            _ => {
                return Err(ConfigError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("unknown key; expected one of {}", SETTABLE_KEYS.join(", ")),
                })
            }
        }
        Ok(())
    }
}

/// Base directory for configuration and data: `$GASTOMETRO_HOME`, else the
/// platform data directory.
pub fn default_base_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gastometro")
}
