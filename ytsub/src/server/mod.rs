pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod templates;

pub use config::Configuration;
pub use error::ServerError;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::auth::OAuthClient;
use crate::channel::ChannelResolver;
use services::SessionStore;

pub const SESSION_COOKIE: &str = "ytsub_session";

// Form posts are a single text field
pub(crate) const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub session_store: Arc<SessionStore>,
    pub oauth_client: Arc<OAuthClient>,
    pub resolver: Arc<ChannelResolver>,
    pub api_base_url: Arc<str>,
    pub cookie_key: Key,
    /// Only set `Secure` on cookies when served over HTTPS (behind the proxy)
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(configuration: &Configuration) -> Result<Self, ServerError> {
        let oauth_client = OAuthClient::new(
            &configuration.oauth.client_id,
            configuration.oauth.client_secret.expose_secret(),
            Some(&configuration.oauth.redirect_uri),
        )?;

        Ok(Self {
            session_store: Arc::new(SessionStore::new(
                configuration.server.session_ttl_seconds,
            )),
            oauth_client: Arc::new(oauth_client),
            resolver: Arc::new(ChannelResolver::new(
                configuration.youtube.platform_domain.clone(),
            )),
            api_base_url: configuration.youtube.api_base_url.as_str().into(),
            cookie_key: derive_cookie_key(configuration.server.session_secret.expose_secret()),
            secure_cookies: configuration.server.environment.is_production(),
        })
    }

    pub fn session_cookie(&self, session_id: String) -> Cookie<'static> {
        let max_age = i64::try_from(self.session_store.ttl().as_secs()).unwrap_or(i64::MAX);
        Cookie::build((SESSION_COOKIE, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::seconds(max_age))
            .build()
    }

    /// Session id from a verified cookie, if it still refers to a live session
    pub fn session_id(&self, jar: &SignedCookieJar) -> Option<String> {
        let session_id = jar.get(SESSION_COOKIE)?.value().to_string();
        self.session_store
            .get_session(&session_id)
            .map(|session| session.session_id)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Signing key for the session cookie, stretched from the configured secret
pub fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/auth", get(handlers::initiate_auth))
        .route("/auth/google/callback", get(handlers::oauth_callback))
        .route("/logout", get(handlers::logout))
        .route("/subscribe", post(handlers::subscribe))
        .route("/privacy", get(handlers::privacy))
        .route("/terms", get(handlers::terms))
        .route("/health", get(handlers::health_check))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
