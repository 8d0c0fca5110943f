use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::AuthError;
use crate::server::config::{default_api_base_url, default_platform_domain};

const APP_DIR: &str = "ytsub";

#[derive(Debug, Deserialize, Clone)]
pub struct LocalSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Port for the consent callback listener; 0 picks a free one
    #[serde(default)]
    pub callback_port: u16,

    pub token_path: Option<PathBuf>,
    pub credentials_path: Option<PathBuf>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_platform_domain")]
    pub platform_domain: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl LocalSettings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("YTSUB_LOCAL_CONFIG").unwrap_or_else(|_| "ytsub-local.toml".to_string());

        Self::from_builder(
            Config::builder().add_source(File::with_name(&config_path).required(false)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(config::Environment::with_prefix("YTSUB_LOCAL").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.api_base_url.starts_with("http") {
            return Err("api_base_url must be a valid HTTP(S) URL".to_string());
        }
        if self.platform_domain.trim().is_empty() {
            return Err("platform_domain cannot be empty".to_string());
        }
        Ok(())
    }

    /// Stored grant, `<config dir>/ytsub/token.json` unless configured
    pub fn token_path(&self) -> Result<PathBuf, AuthError> {
        match &self.token_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_config_dir()?.join("token.json")),
        }
    }

    /// Google client secrets, `<config dir>/ytsub/credentials.json` unless configured
    pub fn credentials_path(&self) -> Result<PathBuf, AuthError> {
        match &self.credentials_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_config_dir()?.join("credentials.json")),
        }
    }
}

fn app_config_dir() -> Result<PathBuf, AuthError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| AuthError::Configuration("No config directory for this platform".to_string()))
}
