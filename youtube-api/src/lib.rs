pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::{ErrorDetail, ErrorItem, ErrorResponse, YoutubeApiError};
pub use tower_api_client::StatusCode;
use repositories::*;
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Authenticated handle for the YouTube Data API.
///
/// Every call carries the bearer token the client was built with; there is no
/// shared or global auth state.
pub struct Client {
    inner: ApiClient,
}

impl Client {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(BASE_URL, access_token)
    }

    pub fn with_base_url(base_url: &str, access_token: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url).bearer_auth(access_token),
        }
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, YoutubeApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }
}

pub struct Request;

impl Request {
    pub fn channels() -> ChannelRepository {
        ChannelRepository::new()
    }

    pub fn search() -> SearchRepository {
        SearchRepository::new()
    }

    pub fn subscriptions() -> SubscriptionRepository {
        SubscriptionRepository::new()
    }
}
