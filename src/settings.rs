use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KakeiboError, Result};

pub const API_URL_ENV: &str = "KAKEIBO_API_URL";
pub const CONFIG_DIR_ENV: &str = "KAKEIBO_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_api_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_user_id() -> i64 {
    1
}

fn default_currency_symbol() -> String {
    "¥".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_id: default_user_id(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kakeibo")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| KakeiboError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

/// Settings file merged with the environment: `KAKEIBO_API_URL` wins over
/// the stored `api_url`.
pub fn effective_settings() -> Settings {
    apply_env(load_settings(), std::env::var(API_URL_ENV).ok())
}

fn apply_env(mut settings: Settings, api_url: Option<String>) -> Settings {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        settings.api_url = url;
    }
    settings
}
