use thiserror::Error;
use youtube_api::{YoutubeApiError, endpoints::ChannelId};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization code missing from callback")]
    MissingCode,

    #[error("Token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Authorization denied: {0}")]
    Denied(String),

    #[error("Authorization state mismatch")]
    StateMismatch,

    #[error("Timed out waiting for authorization")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Credential storage error: {0}")]
    CredentialStorage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    /// Short code shown to the user instead of provider details.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCode => "missing_code",
            AuthError::ExchangeFailed(_) => "exchange_failed",
            AuthError::Denied(_) => "access_denied",
            AuthError::StateMismatch => "state_mismatch",
            AuthError::Timeout => "timeout",
            AuthError::Configuration(_) => "configuration",
            AuthError::CredentialStorage(_) | AuthError::Json(_) | AuthError::Io(_) => "storage",
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Channel not found.")]
    NotFound,

    #[error("Enter a channel URL, handle, or name.")]
    EmptyInput,
}

#[derive(Error, Debug)]
pub enum SubscribeError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Channel {0} does not exist.")]
    NotFound(ChannelId),

    #[error("{0}")]
    Upstream(#[from] YoutubeApiError),

    #[error("Authorization failed ({}). Please try again.", .0.code())]
    Auth(#[from] AuthError),
}
