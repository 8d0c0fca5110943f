use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::CredentialStore;
use crate::common::Credential;
use crate::error::AuthError;
use crate::server::config::deserialize_secret;

const AUTHORIZED_USER: &str = "authorized_user";

/// Client ID and secret from a Google client-secrets download
#[derive(Debug, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub client_secret: SecretString,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ClientSecretsFile {
    Installed(ClientSecrets),
    Web(ClientSecrets),
}

impl ClientSecrets {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let json = fs::read_to_string(path).map_err(|e| {
            AuthError::Configuration(format!(
                "Failed to read client secrets at {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: ClientSecretsFile = serde_json::from_str(&json).map_err(|e| {
            AuthError::Configuration(format!("Invalid client secrets file: {}", e))
        })?;

        Ok(match file {
            ClientSecretsFile::Installed(secrets) | ClientSecretsFile::Web(secrets) => secrets,
        })
    }
}

/// On-disk grant. Only the refresh token is kept; access tokens are
/// re-issued on startup.
#[derive(Serialize, Deserialize)]
struct AuthorizedUser {
    #[serde(rename = "type")]
    kind: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

pub struct FileCredentialStore {
    token_path: PathBuf,
    secrets: ClientSecrets,
}

impl FileCredentialStore {
    pub fn new(token_path: PathBuf, secrets: ClientSecrets) -> Self {
        Self {
            token_path,
            secrets,
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    fn write_token(&self, user: &AuthorizedUser) -> Result<(), AuthError> {
        if let Some(dir) = self.token_path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                AuthError::CredentialStorage(format!("Failed to create token directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(user)?;
        fs::write(&self.token_path, json)
            .map_err(|e| AuthError::CredentialStorage(format!("Failed to save token: {}", e)))?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.token_path, fs::Permissions::from_mode(0o600)).map_err(
                |e| AuthError::CredentialStorage(format!("Failed to set file permissions: {}", e)),
            )?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credential> {
        if !self.token_path.exists() {
            return None;
        }

        let user = fs::read_to_string(&self.token_path)
            .map_err(AuthError::from)
            .and_then(|json| Ok(serde_json::from_str::<AuthorizedUser>(&json)?));

        match user {
            Ok(user) if user.kind == AUTHORIZED_USER && !user.refresh_token.is_empty() => {
                Some(Credential {
                    access_token: String::new(),
                    refresh_token: Some(user.refresh_token),
                    expires_at: None,
                })
            }
            Ok(user) => {
                tracing::warn!(kind = %user.kind, path = %self.token_path.display(), "Ignoring unusable token file");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %self.token_path.display(), "Failed to read token file");
                None
            }
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        let Some(refresh_token) = &credential.refresh_token else {
            tracing::debug!("No refresh token issued, keeping stored grant");
            return Ok(());
        };

        self.write_token(&AuthorizedUser {
            kind: AUTHORIZED_USER.to_string(),
            client_id: self.secrets.client_id.clone(),
            client_secret: self.secrets.client_secret.expose_secret().to_string(),
            refresh_token: refresh_token.clone(),
        })
    }

    fn clear(&self) -> Result<(), AuthError> {
        if self.token_path.exists() {
            fs::remove_file(&self.token_path)
                .map_err(|e| AuthError::CredentialStorage(format!("Failed to delete token: {}", e)))?;
        }
        Ok(())
    }
}
