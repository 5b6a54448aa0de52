//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for the parley demo CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stream responses word by word by default
    pub stream: Option<bool>,
    /// Minimum interval between streamed updates, in milliseconds
    pub throttle_ms: Option<u64>,
    /// Content shown on the pending assistant message
    pub placeholder: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parley")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for PARLEY_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("PARLEY_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Write an example config file, creating the directory as needed
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, example_config())?;
        Ok(path)
    }
}

/// Example configuration shown by --init-config
pub fn example_config() -> &'static str {
    "\
# parley demo CLI configuration
#
# stream = true
# throttle_ms = 50
# placeholder = \"Processing your request...\"
"
}
