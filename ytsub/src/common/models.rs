use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const EXPIRY_BUFFER: Duration = Duration::minutes(5);

/// Authorization grant obtained from the OAuth2 flow
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// A credential without an access token cannot authorize API calls.
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Tokens are treated as expired 5 minutes early. A missing expiry counts
    /// as still valid; the API rejects the call if it is not.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now() + EXPIRY_BUFFER,
            None => false,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.has_access_token() && !self.is_expired()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &presence(!self.access_token.is_empty()))
            .field("refresh_token", &presence(self.refresh_token.is_some()))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn presence(present: bool) -> &'static str {
    if present { "exists" } else { "missing" }
}

/// Outcome of a successful subscribe call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionResult {
    pub success: bool,
    pub channel_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(access_token: &str, expires_in: Option<Duration>) -> Credential {
        Credential {
            access_token: access_token.to_string(),
            refresh_token: Some("secret-refresh".to_string()),
            expires_at: expires_in.map(|d| Utc::now() + d),
        }
    }

    #[test]
    fn test_fresh_token_is_usable() {
        assert!(credential("access", Some(Duration::hours(1))).is_usable());
    }

    #[test]
    fn test_token_inside_buffer_is_expired() {
        let cred = credential("access", Some(Duration::minutes(2)));
        assert!(cred.is_expired());
        assert!(!cred.is_usable());
    }

    #[test]
    fn test_empty_access_token_is_not_usable() {
        assert!(!credential("", None).is_usable());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let out = format!("{:?}", credential("secret-access", None));
        assert!(!out.contains("secret-access"));
        assert!(!out.contains("secret-refresh"));
        assert!(out.contains("exists"));
    }
}
