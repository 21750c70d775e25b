//! Application configuration

use std::path::{Path, PathBuf};

use hostedit_core::error::{CoreError, CoreResult};
use hostedit_core::types::DEFAULT_ENCODING;
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "hostedit";
const CONFIG_FILE_NAME: &str = "config.json";
const HOSTS_FILE_NAME: &str = "hosts.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Encoding given to newly created hosts
    pub default_encoding: String,
    /// Build the charset catalog in the background at startup
    pub prewarm_catalog: bool,
    /// Host store file; platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_encoding: DEFAULT_ENCODING.to_string(),
            prewarm_catalog: true,
            store_path: None,
        }
    }
}

impl AppConfig {
    /// Effective host store location
    pub fn resolve_store_path(&self) -> CoreResult<PathBuf> {
        if let Some(ref path) = self.store_path {
            return Ok(path.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(HOSTS_FILE_NAME))
            .ok_or_else(|| CoreError::ConfigError("no local data directory on this platform".to_string()))
    }
}

/// Configuration service trait
pub trait ConfigService: Send + Sync {
    /// Load configuration
    fn load(&self) -> CoreResult<AppConfig>;

    /// Save configuration
    fn save(&self, config: &AppConfig) -> CoreResult<()>;
}

/// JSON file configuration service
pub struct FileConfigService {
    path: PathBuf,
}

impl FileConfigService {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service over the platform config directory
    pub fn platform_default() -> CoreResult<Self> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)))
            .ok_or_else(|| CoreError::ConfigError("no config directory on this platform".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigService for FileConfigService {
    fn load(&self) -> CoreResult<AppConfig> {
        if !self.path.exists() {
            log::debug!("Config file {:?} not found, using defaults", self.path);
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| CoreError::ConfigError(format!("Failed to read config file: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::ConfigError(format!("Invalid config file: {e}")))
    }

    fn save(&self, config: &AppConfig) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::ConfigError(format!("Failed to create directory: {e}")))?;
        }
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json)
            .map_err(|e| CoreError::ConfigError(format!("Failed to write config file: {e}")))
    }
}
