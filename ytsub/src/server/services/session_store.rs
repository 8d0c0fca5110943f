use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::CredentialStore;
use crate::common::Credential;
use crate::error::AuthError;
use crate::server::models::BrowserSession;

pub struct SessionStore {
    sessions: Arc<DashMap<String, BrowserSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        let store = Self {
            sessions: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        };

        // Spawn background cleanup task
        let sessions_clone = store.sessions.clone();
        let ttl_clone = store.ttl;
        tokio::spawn(async move {
            cleanup_expired_sessions(sessions_clone, ttl_clone).await;
        });

        tracing::info!(
            "Session store initialized with TTL of {} seconds",
            ttl_seconds
        );
        store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create an empty session
    pub fn create_session(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = BrowserSession {
            session_id: session_id.clone(),
            created_at: Utc::now(),
            oauth_state: None,
            credential: None,
        };
        self.sessions.insert(session_id.clone(), session);
        tracing::debug!(session_id = %session_id, "Created session");
        session_id
    }

    /// Get a live session by ID. Sessions past their TTL are invisible even
    /// before the cleanup task removes them.
    pub fn get_session(&self, session_id: &str) -> Option<BrowserSession> {
        self.sessions
            .get(session_id)
            .filter(|s| !is_expired(s, self.ttl))
            .map(|s| s.clone())
    }

    /// Update a session using a closure
    pub fn update_session<F>(&self, session_id: &str, update_fn: F) -> bool
    where
        F: FnOnce(&mut BrowserSession),
    {
        self.sessions
            .get_mut(session_id)
            .filter(|s| !is_expired(s, self.ttl))
            .map(|mut s| {
                update_fn(&mut s);
                true
            })
            .unwrap_or(false)
    }

    pub fn set_oauth_state(&self, session_id: &str, state: String) -> bool {
        self.update_session(session_id, |s| s.oauth_state = Some(state))
    }

    /// One-time read of the pending CSRF state
    pub fn take_oauth_state(&self, session_id: &str) -> Option<String> {
        let mut state = None;
        self.update_session(session_id, |s| state = s.oauth_state.take());
        state
    }

    pub fn credential(&self, session_id: &str) -> Option<Credential> {
        self.get_session(session_id).and_then(|s| s.credential)
    }

    pub fn set_credential(&self, session_id: &str, credential: Credential) -> bool {
        self.update_session(session_id, |s| s.credential = Some(credential))
    }

    /// Delete a session
    pub fn delete_session(&self, session_id: &str) {
        self.sessions.remove(session_id);
        tracing::debug!("Session deleted: {}", session_id);
    }
}

/// Sessions that never completed authorization only need to outlive the
/// consent screen.
const PENDING_SESSION_TTL: Duration = Duration::from_secs(10 * 60);

fn is_expired(session: &BrowserSession, ttl: Duration) -> bool {
    let ttl = match session.credential {
        Some(_) => ttl,
        None => ttl.min(PENDING_SESSION_TTL),
    };
    Utc::now()
        .signed_duration_since(session.created_at)
        .to_std()
        .unwrap_or(Duration::ZERO)
        >= ttl
}

/// Background task that periodically cleans up expired sessions
async fn cleanup_expired_sessions(sessions: Arc<DashMap<String, BrowserSession>>, ttl: Duration) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        interval.tick().await;
        let initial_count = sessions.len();

        sessions.retain(|session_id, session| {
            if is_expired(session, ttl) {
                tracing::debug!(session_id = %session_id, "Cleaning up expired session");
                false
            } else {
                true
            }
        });

        let cleaned = initial_count.saturating_sub(sessions.len());
        if cleaned > 0 {
            tracing::info!(
                "Cleaned up {} expired sessions, {} remaining",
                cleaned,
                sessions.len()
            );
        }
    }
}

/// [`CredentialStore`] view of one browser session
pub struct SessionCredentials {
    store: Arc<SessionStore>,
    session_id: String,
}

impl SessionCredentials {
    pub fn new(store: Arc<SessionStore>, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
        }
    }
}

impl CredentialStore for SessionCredentials {
    fn load(&self) -> Option<Credential> {
        self.store.credential(&self.session_id)
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        if self.store.set_credential(&self.session_id, credential.clone()) {
            Ok(())
        } else {
            Err(AuthError::CredentialStorage(
                "Session expired before credentials could be stored".to_string(),
            ))
        }
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.store.delete_session(&self.session_id);
        Ok(())
    }
}
