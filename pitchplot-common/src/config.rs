//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Environment variables (highest priority)
//! 2. TOML config file (`PITCHPLOT_CONFIG` path, or the platform config dir)
//! 3. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Service configuration for the pitch visualizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen port (default: 5750)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted decoded image size in bytes (default: 8 MiB)
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Vision model provider settings
    #[serde(default)]
    pub vision: VisionConfig,
}

/// Vision model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Provider API key (usually supplied via `ANTHROPIC_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every extraction request
    #[serde(default = "default_model")]
    pub model: String,

    /// Token ceiling for the model reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Provider base URL (override for testing)
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

// Default value functions
fn default_port() -> u16 {
    5750
}

fn default_max_image_bytes() -> usize {
    8 * 1024 * 1024
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_image_bytes: default_max_image_bytes(),
            vision: VisionConfig::default(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            base_url: default_base_url(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration with full resolution: defaults, then the TOML
    /// config file if one exists, then environment variable overrides.
    pub fn load() -> Result<Self> {
        let mut config = match locate_config_file() {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&contents)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML document, filling in defaults for
    /// missing keys.
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply environment variable overrides on top of file/default values.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.is_empty() {
                if self.vision.api_key.is_some() {
                    warn!("ANTHROPIC_API_KEY overrides api_key from config file");
                }
                self.vision.api_key = Some(key);
            }
        }

        if let Ok(port) = std::env::var("PITCHPLOT_PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => warn!("Ignoring unparseable PITCHPLOT_PORT value: {}", port),
            }
        }
    }
}

/// Find the configuration file, if any.
///
/// `PITCHPLOT_CONFIG` names an explicit path; otherwise the platform
/// config directory is checked for `pitchplot/config.toml`.
fn locate_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PITCHPLOT_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!("PITCHPLOT_CONFIG points at a missing file: {}", path.display());
        return None;
    }

    let candidate = dirs::config_dir().map(|d| d.join("pitchplot").join("config.toml"))?;
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}
