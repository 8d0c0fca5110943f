use chrono::{DateTime, Utc};

use crate::common::Credential;

/// Server-side state behind one browser's session cookie
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    /// CSRF state of an authorization in flight
    pub oauth_state: Option<String>,
    pub credential: Option<Credential>,
}
