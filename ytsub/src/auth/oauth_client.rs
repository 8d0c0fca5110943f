use chrono::Utc;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    HttpRequest, HttpResponse, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
    basic::{BasicClient, BasicTokenResponse},
};
use rand::Rng;

use crate::common::Credential;
use crate::error::AuthError;

// Token requests must not follow redirects
async fn http_client(request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let mut builder = client
        .request(request.method().clone(), request.uri().to_string())
        .body(request.body().clone());

    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    let mut http_response = HttpResponse::new(body);
    *http_response.status_mut() = status;

    Ok(http_response)
}

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scopes needed to write subscriptions
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/youtube.force-ssl",
    "https://www.googleapis.com/auth/youtube",
];

type GoogleClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Google OAuth2 authorization-code client
#[derive(Clone)]
pub struct OAuthClient {
    client: GoogleClient,
}

impl OAuthClient {
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: Option<&str>,
    ) -> Result<Self, AuthError> {
        Self::with_endpoints(
            client_id,
            client_secret,
            redirect_uri,
            GOOGLE_AUTH_URL,
            GOOGLE_TOKEN_URL,
        )
    }

    pub fn with_endpoints(
        client_id: &str,
        client_secret: &str,
        redirect_uri: Option<&str>,
        auth_url: &str,
        token_url: &str,
    ) -> Result<Self, AuthError> {
        let auth_url = AuthUrl::new(auth_url.to_string())
            .map_err(|e| AuthError::Configuration(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(token_url.to_string())
            .map_err(|e| AuthError::Configuration(format!("Invalid token URL: {}", e)))?;

        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url);

        let client = match redirect_uri {
            Some(redirect_uri) => client.set_redirect_uri(
                RedirectUrl::new(redirect_uri.to_string()).map_err(|e| {
                    AuthError::Configuration(format!("Invalid redirect URI: {}", e))
                })?,
            ),
            None => client,
        };

        Ok(Self { client })
    }

    /// Same client, different callback (the local listener only knows its
    /// port once bound).
    pub fn with_redirect_uri(&self, redirect_uri: &str) -> Result<Self, AuthError> {
        let redirect_url = RedirectUrl::new(redirect_uri.to_string())
            .map_err(|e| AuthError::Configuration(format!("Invalid redirect URI: {}", e)))?;

        Ok(Self {
            client: self.client.clone().set_redirect_uri(redirect_url),
        })
    }

    /// Build authorization URL with state parameter for CSRF protection
    pub fn build_authorization_url(&self, state: &str) -> String {
        let csrf_token = CsrfToken::new(state.to_string());
        let (auth_url, _) = self
            .client
            .authorize_url(|| csrf_token)
            .add_scopes(SCOPES.iter().map(|scope| Scope::new(scope.to_string())))
            .add_extra_param("access_type", "offline")
            .add_extra_param("include_granted_scopes", "true")
            .add_extra_param("prompt", "consent")
            .url();
        auth_url.to_string()
    }

    /// Exchange authorization code for access and refresh tokens
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, AuthError> {
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&http_client)
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

        let credential = into_credential(token_result, None);

        tracing::debug!(
            refresh_token = credential.refresh_token.is_some(),
            expires_at = ?credential.expires_at,
            "Exchanged authorization code for tokens"
        );

        Ok(credential)
    }

    /// Refresh an expired access token. Google usually omits the refresh
    /// token from the response, in which case the old one is kept.
    pub async fn refresh(&self, credential: &Credential) -> Result<Credential, AuthError> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| AuthError::ExchangeFailed("No refresh token stored".to_string()))?;

        let token_result = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&http_client)
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

        let refreshed = into_credential(token_result, Some(refresh_token));

        tracing::debug!(expires_at = ?refreshed.expires_at, "Refreshed access token");

        Ok(refreshed)
    }

    /// Generate a random CSRF state token
    pub fn generate_state_token() -> String {
        use base64::Engine;
        let mut rng = rand::rng();
        let random_bytes: Vec<u8> = (0..32).map(|_| rng.random()).collect();
        base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(&random_bytes)
    }
}

fn into_credential(token_result: BasicTokenResponse, previous_refresh: Option<&str>) -> Credential {
    let expires_at = token_result
        .expires_in()
        .and_then(|expires_in| chrono::Duration::from_std(expires_in).ok())
        .map(|expires_in| Utc::now() + expires_in);

    let refresh_token = token_result
        .refresh_token()
        .map(|token| token.secret().to_string())
        .or_else(|| previous_refresh.map(str::to_string));

    Credential {
        access_token: token_result.access_token().secret().to_string(),
        refresh_token,
        expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        OAuthClient::new(
            "client-id.apps.googleusercontent.com",
            "client-secret",
            Some("http://localhost:3000/auth/google/callback"),
        )
        .unwrap()
    }

    #[test]
    fn test_authorization_url_requests_offline_subscription_scopes() {
        let url = url::Url::parse(&client().build_authorization_url("state-123")).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(params["state"], "state-123");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["prompt"], "consent");
        assert_eq!(params["include_granted_scopes"], "true");
        assert_eq!(params["response_type"], "code");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:3000/auth/google/callback"
        );
        assert!(params["scope"].contains("youtube.force-ssl"));
        assert!(params["scope"].contains("auth/youtube"));
    }

    #[test]
    fn test_invalid_redirect_is_configuration_error() {
        let Err(err) = OAuthClient::new("id", "secret", Some("not a url")) else {
            panic!("invalid redirect URI was accepted");
        };
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn test_state_tokens_are_random_and_url_safe() {
        let a = OAuthClient::generate_state_token();
        let b = OAuthClient::generate_state_token();
        assert_ne!(a, b);
        assert!(!a.contains('+') && !a.contains('/') && !a.contains('='));
    }

    #[tokio::test]
    async fn test_exchange_code_builds_credential() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "access_token": "new-access",
                    "refresh_token": "new-refresh",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let oauth = OAuthClient::with_endpoints(
            "id",
            "secret",
            Some("http://localhost/callback"),
            &format!("{}/auth", server.url()),
            &format!("{}/token", server.url()),
        )
        .unwrap();

        let credential = oauth.exchange_code("code-1").await.unwrap();
        assert_eq!(credential.access_token, "new-access");
        assert_eq!(credential.refresh_token.as_deref(), Some("new-refresh"));
        assert!(credential.is_usable());
    }

    #[tokio::test]
    async fn test_rejected_code_is_exchange_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid_grant","error_description":"Bad Request"}"#)
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

        let err = oauth.exchange_code("bad-code").await.unwrap_err();
        assert_eq!(err.code(), "exchange_failed");
    }
}
