use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::channel::DEFAULT_PLATFORM_DOMAIN;

#[derive(Debug, Deserialize)]
pub struct Configuration {
    pub server: ServerConfiguration,
    pub oauth: OAuthConfiguration,
    #[serde(default)]
    pub youtube: YoutubeConfiguration,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    #[serde(deserialize_with = "deserialize_secret")]
    pub session_secret: SecretString,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Deserialize)]
pub struct OAuthConfiguration {
    pub client_id: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub client_secret: SecretString,
    pub redirect_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeConfiguration {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_platform_domain")]
    pub platform_domain: String,
}

impl Default for YoutubeConfiguration {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            platform_domain: default_platform_domain(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

// 24 hours
fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

pub(crate) fn default_api_base_url() -> String {
    youtube_api::BASE_URL.to_string()
}

pub(crate) fn default_platform_domain() -> String {
    DEFAULT_PLATFORM_DOMAIN.to_string()
}

pub(crate) fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Configuration {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(config::File::with_name("config"));
        }

        builder = builder.add_source(config::Environment::with_prefix("YTSUB").separator("__"));

        let configuration: Self = builder.build()?.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        use secrecy::ExposeSecret;

        if self.server.session_secret.expose_secret().is_empty() {
            return Err(config::ConfigError::Message(
                "server.session_secret must not be empty".to_string(),
            ));
        }
        if self.oauth.client_id.is_empty() {
            return Err(config::ConfigError::Message(
                "oauth.client_id is required".to_string(),
            ));
        }
        if !self.oauth.redirect_uri.starts_with("http") {
            return Err(config::ConfigError::Message(
                "oauth.redirect_uri must be a valid HTTP(S) URL".to_string(),
            ));
        }
        if self.server.session_ttl_seconds == 0 {
            return Err(config::ConfigError::Message(
                "server.session_ttl_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
