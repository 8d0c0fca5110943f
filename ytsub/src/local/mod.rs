//! Single-operator variant: the grant lives in a file and consent runs
//! through a loopback listener the first time a subscription needs it.

mod consent;
mod handlers;
mod settings;
mod token_storage;

pub use consent::{CALLBACK_PATH, CONSENT_TIMEOUT, ConsentListener};
pub use settings::LocalSettings;
pub use token_storage::{ClientSecrets, FileCredentialStore};

use axum::{
    Router,
    routing::{get, post},
};
use secrecy::ExposeSecret;
use std::sync::{Arc, Mutex};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use youtube_api::Client;

use crate::auth::{Authorization, Authorizer, CredentialStore, OAuthClient};
use crate::channel::ChannelResolver;
use crate::common::Credential;
use crate::error::AuthError;
use crate::server::MAX_BODY_BYTES;

/// File-backed authorizer that runs the consent flow itself when needed.
pub struct LocalAuthorizer {
    file: FileCredentialStore,
    // The file only keeps the refresh token
    cached: Mutex<Option<Credential>>,
    oauth_client: OAuthClient,
    api_base_url: String,
    callback_port: u16,
    flow: tokio::sync::Mutex<()>,
}

impl LocalAuthorizer {
    pub fn new(
        file: FileCredentialStore,
        oauth_client: OAuthClient,
        api_base_url: impl Into<String>,
        callback_port: u16,
    ) -> Self {
        Self {
            file,
            cached: Mutex::new(None),
            oauth_client,
            api_base_url: api_base_url.into(),
            callback_port,
            flow: tokio::sync::Mutex::new(()),
        }
    }

    pub fn from_settings(settings: &LocalSettings) -> Result<Self, AuthError> {
        let secrets = ClientSecrets::load(&settings.credentials_path()?)?;
        let oauth_client = OAuthClient::new(
            &secrets.client_id,
            secrets.client_secret.expose_secret(),
            None,
        )?;
        let file = FileCredentialStore::new(settings.token_path()?, secrets);
        tracing::debug!(path = %file.token_path().display(), "Using token file");

        Ok(Self::new(
            file,
            oauth_client,
            settings.api_base_url.clone(),
            settings.callback_port,
        ))
    }

    fn store(&self) -> CachedStore<'_> {
        CachedStore {
            file: &self.file,
            cached: &self.cached,
        }
    }

    /// Client for the stored grant, running the consent flow if there is none.
    pub async fn authorize(&self) -> Result<Client, AuthError> {
        // Concurrent requests wait on a single consent flow
        let _flow = self.flow.lock().await;

        let authorizer = Authorizer::new(self.store(), &self.oauth_client, &self.api_base_url);
        match authorizer.authorize().await? {
            Authorization::Authorized(client) => Ok(client),
            Authorization::Required => self.run_consent().await,
        }
    }

    async fn run_consent(&self) -> Result<Client, AuthError> {
        let listener = ConsentListener::bind(self.callback_port).await?;
        let oauth_client = self.oauth_client.with_redirect_uri(&listener.redirect_uri())?;

        let state = OAuthClient::generate_state_token();
        let auth_url = oauth_client.build_authorization_url(&state);
        open_browser(&auth_url);

        let code = listener.wait_for_code(&state, CONSENT_TIMEOUT).await?;

        let authorizer = Authorizer::new(self.store(), &oauth_client, &self.api_base_url);
        let credential = authorizer.complete(&code).await?;

        Ok(authorizer.client_for(&credential))
    }
}

fn open_browser(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(error = %e, "Failed to open browser");
        eprintln!("Failed to open browser automatically: {}", e);
        eprintln!("\nPlease open this URL in your browser:");
        eprintln!("{}\n", url);
    } else {
        println!("Browser opened. Please authorize ytsub...");
        println!("\nYou can also open this URL directly in your browser:");
        println!("{}\n", url);
    }
}

/// In-memory access token in front of the token file
struct CachedStore<'a> {
    file: &'a FileCredentialStore,
    cached: &'a Mutex<Option<Credential>>,
}

impl CredentialStore for CachedStore<'_> {
    fn load(&self) -> Option<Credential> {
        let cached = self.cached.lock().unwrap_or_else(|e| e.into_inner()).clone();
        cached.or_else(|| self.file.load())
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        self.file.save(credential)?;
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.file.clear()
    }
}

#[derive(Clone)]
pub struct LocalState {
    pub authorizer: Arc<LocalAuthorizer>,
    pub resolver: Arc<ChannelResolver>,
}

impl LocalState {
    pub fn new(authorizer: LocalAuthorizer, settings: &LocalSettings) -> Self {
        Self {
            authorizer: Arc::new(authorizer),
            resolver: Arc::new(ChannelResolver::new(settings.platform_domain.clone())),
        }
    }
}

pub fn router(state: LocalState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/subscribe", post(handlers::subscribe))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use secrecy::SecretString;
    use tempfile::TempDir;

    fn secrets() -> ClientSecrets {
        ClientSecrets {
            client_id: "client-id".to_string(),
            client_secret: SecretString::from("client-secret".to_string()),
        }
    }

    fn authorizer(dir: &TempDir, token_url: &str) -> LocalAuthorizer {
        let oauth_client = OAuthClient::with_endpoints(
            "client-id",
            "client-secret",
            None,
            "https://accounts.example/auth",
            token_url,
        )
        .unwrap();
        let file = FileCredentialStore::new(dir.path().join("token.json"), secrets());
        LocalAuthorizer::new(file, oauth_client, "https://api.example/youtube/v3", 0)
    }

    #[tokio::test]
    async fn test_stored_refresh_token_is_exchanged_once() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "access_token": "fresh-access",
                    "token_type": "Bearer",
                    "expires_in": 3599
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let authorizer = authorizer(&dir, &format!("{}/token", server.url()));
        authorizer
            .file
            .save(&Credential {
                access_token: String::new(),
                refresh_token: Some("refresh-1".to_string()),
                expires_at: None,
            })
            .unwrap();

        authorizer.authorize().await.unwrap();
        // Second call is served from the in-memory access token
        authorizer.authorize().await.unwrap();

        token.assert_async().await;
        let cached = authorizer.store().load().unwrap();
        assert_eq!(cached.access_token, "fresh-access");
        assert_eq!(cached.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_cached_store_clear_removes_both() {
        let dir = TempDir::new().unwrap();
        let file = FileCredentialStore::new(dir.path().join("token.json"), secrets());
        let cached = Mutex::new(None);
        let store = CachedStore {
            file: &file,
            cached: &cached,
        };

        store
            .save(&Credential {
                access_token: "access".to_string(),
                refresh_token: Some("refresh-1".to_string()),
                expires_at: Some(Utc::now() + Duration::hours(1)),
            })
            .unwrap();
        assert!(store.load().unwrap().is_usable());

        store.clear().unwrap();

        assert!(store.load().is_none());
        assert!(!file.token_path().exists());
    }
}
