use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/widget.json";
pub const ENDPOINT_ENV_VAR: &str = "CHAT_ENDPOINT";

pub const DEFAULT_GREETING: &str = "Hi Welcome to CMC, I'm here to guide you. Can you tell me who you are? A student, Job seeker, or Patient.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Full URL of the `/chat` endpoint the widget posts to.
    pub endpoint: String,
    /// Bot greeting appended every time the panel is opened.
    pub greeting: String,
    pub title: String,
    /// Hiển thị panel debug (danh sách lỗi chẩn đoán).
    pub debug_panel: bool,
    /// Bind address for `serve` mode.
    pub listen: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/chat".to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            title: "CMC Assistant".to_string(),
            debug_panel: false,
            listen: "127.0.0.1:5000".to_string(),
        }
    }
}

impl AppConfig {
    /// Replaces the endpoint when an override is present and non-blank.
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|value| !value.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        self
    }
}

pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str::<AppConfig>(&content)?)
}

/// Loads the config file, falling back to defaults when it is missing or invalid,
/// then applies the `CHAT_ENDPOINT` environment override.
pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    let config = match read_config(path) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
        Err(err) => {
            log::warn!("Failed to load config file {}: {err}", path.display());
            AppConfig::default()
        }
    };

    config.with_endpoint_override(std::env::var(ENDPOINT_ENV_VAR).ok())
}
