mod oauth_client;

pub use oauth_client::{OAuthClient, SCOPES};

use youtube_api::Client;

use crate::common::Credential;
use crate::error::AuthError;

/// Where an authorization grant lives between requests.
///
/// Missing or unreadable storage is reported as `None` so that the caller
/// falls back to a fresh authorization instead of failing.
pub trait CredentialStore {
    fn load(&self) -> Option<Credential>;
    fn save(&self, credential: &Credential) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

pub enum Authorization {
    Authorized(Client),
    Required,
}

/// Turns stored credentials into an API client, refreshing them when they
/// have expired.
pub struct Authorizer<'a, S> {
    store: S,
    oauth_client: &'a OAuthClient,
    api_base_url: &'a str,
}

impl<'a, S: CredentialStore> Authorizer<'a, S> {
    pub fn new(store: S, oauth_client: &'a OAuthClient, api_base_url: &'a str) -> Self {
        Self {
            store,
            oauth_client,
            api_base_url,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn authorize(&self) -> Result<Authorization, AuthError> {
        let Some(credential) = self.store.load() else {
            return Ok(Authorization::Required);
        };

        if credential.is_usable() {
            return Ok(Authorization::Authorized(self.client_for(&credential)));
        }

        if credential.refresh_token.is_none() {
            tracing::debug!("Stored credential expired without refresh token");
            self.store.clear()?;
            return Ok(Authorization::Required);
        }

        match self.oauth_client.refresh(&credential).await {
            Ok(refreshed) => {
                self.store.save(&refreshed)?;
                tracing::info!("Access token refreshed");
                Ok(Authorization::Authorized(self.client_for(&refreshed)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh token, authorization required");
                self.store.clear()?;
                Ok(Authorization::Required)
            }
        }
    }

    /// Exchange the code from the consent callback and persist the grant.
    pub async fn complete(&self, code: &str) -> Result<Credential, AuthError> {
        let credential = self.oauth_client.exchange_code(code).await?;
        self.store.save(&credential)?;
        tracing::info!(credential = ?credential, "Authorization completed");
        Ok(credential)
    }

    pub fn client_for(&self, credential: &Credential) -> Client {
        Client::with_base_url(self.api_base_url, &credential.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    /// In-memory store for authorizer tests
    #[derive(Default)]
    struct MemoryStore {
        pub credential: Mutex<Option<Credential>>,
        pub cleared: Mutex<bool>,
    }

    impl MemoryStore {
        pub fn with(credential: Credential) -> Self {
            Self {
                credential: Mutex::new(Some(credential)),
                cleared: Mutex::new(false),
            }
        }

        pub fn current(&self) -> Option<Credential> {
            self.credential.lock().unwrap().clone()
        }
    }

    impl CredentialStore for MemoryStore {
        fn load(&self) -> Option<Credential> {
            self.current()
        }

        fn save(&self, credential: &Credential) -> Result<(), AuthError> {
            *self.credential.lock().unwrap() = Some(credential.clone());
            Ok(())
        }

        fn clear(&self) -> Result<(), AuthError> {
            *self.credential.lock().unwrap() = None;
            *self.cleared.lock().unwrap() = true;
            Ok(())
        }
    }

    fn expired_credential() -> Credential {
        Credential {
            access_token: "stale-access".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_at: Some(Utc::now() - Duration::minutes(1)),
        }
    }

    async fn token_server(status: usize, body: serde_json::Value) -> (mockito::ServerGuard, OAuthClient) {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;
        let oauth = OAuthClient::with_endpoints(
            "id",
            "secret",
            None,
            &format!("{}/auth", server.url()),
            &format!("{}/token", server.url()),
        )
        .unwrap();
        (server, oauth)
    }

    #[tokio::test]
    async fn test_missing_credential_requires_authorization() {
        let oauth = OAuthClient::new("id", "secret", None).unwrap();
        let authorizer = Authorizer::new(MemoryStore::default(), &oauth, youtube_api::BASE_URL);

        let result = authorizer.authorize().await.unwrap();
        assert!(matches!(result, Authorization::Required));
    }

    #[tokio::test]
    async fn test_valid_credential_is_used_without_refresh() {
        // No token endpoint exists; a refresh attempt would fail the test
        let oauth = OAuthClient::with_endpoints(
            "id",
            "secret",
            None,
            "http://127.0.0.1:9/auth",
            "http://127.0.0.1:9/token",
        )
        .unwrap();
        let store = MemoryStore::with(Credential {
            access_token: "access".to_string(),
            refresh_token: None,
            expires_at: Some(Utc::now() + Duration::hours(1)),
        });
        let authorizer = Authorizer::new(store, &oauth, youtube_api::BASE_URL);

        let result = authorizer.authorize().await.unwrap();
        assert!(matches!(result, Authorization::Authorized(_)));
        assert!(!*authorizer.store().cleared.lock().unwrap());
    }

    #[tokio::test]
    async fn test_expired_credential_is_refreshed_and_saved() {
        let (_server, oauth) = token_server(
            200,
            serde_json::json!({
                "access_token": "fresh-access",
                "expires_in": 3599,
                "token_type": "Bearer"
            }),
        )
        .await;
        let authorizer =
            Authorizer::new(MemoryStore::with(expired_credential()), &oauth, youtube_api::BASE_URL);

        let result = authorizer.authorize().await.unwrap();
        assert!(matches!(result, Authorization::Authorized(_)));

        let saved = authorizer.store().current().unwrap();
        assert_eq!(saved.access_token, "fresh-access");
        // Google omits the refresh token on refresh
        assert_eq!(saved.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_store() {
        let (_server, oauth) = token_server(
            400,
            serde_json::json!({ "error": "invalid_grant" }),
        )
        .await;
        let authorizer =
            Authorizer::new(MemoryStore::with(expired_credential()), &oauth, youtube_api::BASE_URL);

        let result = authorizer.authorize().await.unwrap();
        assert!(matches!(result, Authorization::Required));
        assert!(authorizer.store().current().is_none());
        assert!(*authorizer.store().cleared.lock().unwrap());
    }

    #[tokio::test]
    async fn test_expired_credential_without_refresh_token_is_cleared() {
        let oauth = OAuthClient::new("id", "secret", None).unwrap();
        let store = MemoryStore::with(Credential {
            refresh_token: None,
            ..expired_credential()
        });
        let authorizer = Authorizer::new(store, &oauth, youtube_api::BASE_URL);

        let result = authorizer.authorize().await.unwrap();
        assert!(matches!(result, Authorization::Required));
        assert!(authorizer.store().current().is_none());
    }
}
