use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_store_path")]
    pub store_path: String,

    pub openrouter_api_key: Option<String>,
    pub sheet_id: Option<String>,
    pub sheets_access_token: Option<String>,

    #[serde(default = "default_emoji_density")]
    pub emoji_density: u32,
}

fn default_store_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("postcraft");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir
        .join("saved_posts.json")
        .to_string_lossy()
        .to_string()
}

fn default_emoji_density() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            openrouter_api_key: None,
            sheet_id: None,
            sheets_access_token: None,
            emoji_density: default_emoji_density(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("postcraft")
            .join("config.toml")
    }
}
