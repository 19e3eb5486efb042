use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::FieldDraft;

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_lang() -> String {
    "uk".to_string()
}

fn default_city() -> String {
    "Kyiv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Fields registered when a session starts.
    #[serde(default)]
    pub fields: Vec<FieldDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lang: default_lang(),
            default_city: default_city(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("server host must not be empty")]
    EmptyHost,
    #[error("weather base_url must start with http:// or https://, got '{0}'")]
    BaseUrl(String),
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        let url = &self.weather.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(url.clone()));
        }
        Ok(())
    }

    /// A key from the environment replaces whatever the file contained.
    pub fn with_api_key_from(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|key| !key.trim().is_empty()) {
            self.weather.api_key = Some(key);
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_api_key_from(env::var(API_KEY_ENV).ok())
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Config> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Config::from_yaml_str(&data).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Like [`ConfigLoader::load`], but a missing file yields the defaults.
    pub fn load_or_default(&self, file: impl AsRef<Path>) -> Result<Config> {
        let path = self.base_dir.join(file.as_ref());
        if path.exists() {
            self.load(file)
        } else {
            Ok(Config::default())
        }
    }
}
