//! Channel resolution and subscription.
//!
//! Both steps talk to the platform through [`ChannelApi`], which the
//! authenticated [`youtube_api::Client`] implements. The handle is always
//! passed in explicitly.

mod executor;
mod resolver;

pub use executor::subscribe;
pub use resolver::{ChannelResolver, DEFAULT_PLATFORM_DOMAIN, ResolutionPlan};

use std::future::Future;

use youtube_api::{
    Client, Request, YoutubeApiError,
    endpoints::{ChannelId, channels::Channel, subscriptions::Subscription},
};

use crate::common::SubscriptionResult;
use crate::error::SubscribeError;

/// The three platform calls the subscribe flow needs.
pub trait ChannelApi {
    /// Channel-scoped search, best match first.
    fn search_channels(
        &self,
        term: &str,
        max_results: u32,
    ) -> impl Future<Output = Result<Vec<ChannelId>, YoutubeApiError>> + Send;

    fn find_channel(
        &self,
        channel_id: &ChannelId,
    ) -> impl Future<Output = Result<Option<Channel>, YoutubeApiError>> + Send;

    fn insert_subscription(
        &self,
        channel_id: &ChannelId,
    ) -> impl Future<Output = Result<Subscription, YoutubeApiError>> + Send;
}

impl ChannelApi for Client {
    async fn search_channels(
        &self,
        term: &str,
        max_results: u32,
    ) -> Result<Vec<ChannelId>, YoutubeApiError> {
        let req = Request::search().channels(term).max_results(max_results);
        Ok(self.send(req).await?.channel_ids())
    }

    async fn find_channel(&self, channel_id: &ChannelId) -> Result<Option<Channel>, YoutubeApiError> {
        let req = Request::channels().by_id(channel_id);
        Ok(self.send(req).await?.into_first())
    }

    async fn insert_subscription(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Subscription, YoutubeApiError> {
        self.send(Request::subscriptions().insert(channel_id)).await
    }
}

/// Resolve free-form input and subscribe to the channel it names.
pub async fn subscribe_to_input<A: ChannelApi>(
    resolver: &ChannelResolver,
    input: &str,
    api: &A,
) -> Result<SubscriptionResult, SubscribeError> {
    let channel_id = resolver.resolve(input, api).await?;
    subscribe(&channel_id, api).await
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use youtube_api::endpoints::{ResourceId, channels::ChannelSnippet, subscriptions::SubscriptionSnippet};
    use youtube_api::{ErrorDetail, ErrorItem, StatusCode};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Search(String, u32),
        Find(String),
        Insert(String),
    }

    /// Scripted [`ChannelApi`] that records every call.
    #[derive(Default)]
    pub struct FakeApi {
        pub search_results: HashMap<String, Vec<ChannelId>>,
        pub failing_searches: HashMap<String, String>,
        pub channels: HashMap<String, String>,
        pub insert_error: Option<(StatusCode, String, String)>,
        pub insert_title: Option<String>,
        pub calls: Mutex<Vec<Call>>,
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_search(mut self, term: &str, ids: &[&str]) -> Self {
            self.search_results
                .insert(term.to_string(), ids.iter().map(|id| ChannelId::from(*id)).collect());
            self
        }

        pub fn with_failing_search(mut self, term: &str, message: &str) -> Self {
            self.failing_searches.insert(term.to_string(), message.to_string());
            self
        }

        pub fn with_channel(mut self, id: &str, title: &str) -> Self {
            self.channels.insert(id.to_string(), title.to_string());
            self
        }

        pub fn with_insert_error(mut self, status: StatusCode, reason: &str, message: &str) -> Self {
            self.insert_error = Some((status, reason.to_string(), message.to_string()));
            self
        }

        pub fn with_insert_title(mut self, title: &str) -> Self {
            self.insert_title = Some(title.to_string());
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn searches(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::Search(term, _) => Some(term),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    pub fn api_error(status: StatusCode, reason: &str, message: &str) -> YoutubeApiError {
        YoutubeApiError::Youtube(
            status,
            ErrorDetail {
                code: status.as_u16(),
                message: message.to_string(),
                errors: vec![ErrorItem {
                    message: message.to_string(),
                    domain: "youtube".to_string(),
                    reason: reason.to_string(),
                }],
            },
        )
    }

    impl ChannelApi for FakeApi {
        async fn search_channels(
            &self,
            term: &str,
            max_results: u32,
        ) -> Result<Vec<ChannelId>, YoutubeApiError> {
            self.record(Call::Search(term.to_string(), max_results));
            if let Some(message) = self.failing_searches.get(term) {
                return Err(api_error(StatusCode::FORBIDDEN, "quotaExceeded", message));
            }
            let mut ids = self.search_results.get(term).cloned().unwrap_or_default();
            ids.truncate(max_results as usize);
            Ok(ids)
        }

        async fn find_channel(
            &self,
            channel_id: &ChannelId,
        ) -> Result<Option<Channel>, YoutubeApiError> {
            self.record(Call::Find(channel_id.to_string()));
            Ok(self.channels.get(channel_id.as_str()).map(|title| Channel {
                id: channel_id.clone(),
                snippet: ChannelSnippet {
                    title: title.clone(),
                    description: String::new(),
                    custom_url: None,
                    published_at: None,
                },
            }))
        }

        async fn insert_subscription(
            &self,
            channel_id: &ChannelId,
        ) -> Result<Subscription, YoutubeApiError> {
            self.record(Call::Insert(channel_id.to_string()));
            if let Some((status, reason, message)) = &self.insert_error {
                return Err(api_error(*status, reason, message));
            }
            Ok(Subscription {
                id: "subscription-1".to_string(),
                snippet: Some(SubscriptionSnippet {
                    title: self.insert_title.clone(),
                    resource_id: ResourceId::channel(channel_id.clone()),
                    published_at: None,
                }),
            })
        }
    }
}
