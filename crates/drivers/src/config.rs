use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use photo_utm_adapters::DEFAULT_PHOTO_EXTENSIONS;
use photo_utm_domain::DmsPrecision;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "photo-utm.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extensions: Vec<String>,
    pub output_suffix: String,
    pub dms_precision: DmsPrecision,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_PHOTO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            output_suffix: "fileinfo.csv".to_string(),
            dms_precision: DmsPrecision::DegreesMinutes,
            log_filter: "photo_utm=info".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read config: {msg}"),
            Self::Parse(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads the explicit config file if given, else `photo-utm.toml` from the
/// working directory when present, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => load_from_path(path),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                load_from_path(fallback)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|error| ConfigError::Io(format!("{}: {error}", path.display())))?;
    toml::from_str(&content)
        .map_err(|error| ConfigError::Parse(format!("{}: {error}", path.display())))
}
