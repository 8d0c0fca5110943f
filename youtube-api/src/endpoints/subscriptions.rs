use super::{ChannelId, ResourceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub snippet: Option<SubscriptionSnippet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnippet {
    pub title: Option<String>,
    pub resource_id: ResourceId,
    pub published_at: Option<DateTime<Utc>>,
}

// Requests

/// `POST /subscriptions?part=snippet`
#[derive(Debug, Clone, Serialize)]
pub struct InsertSubscription {
    snippet: NewSubscriptionSnippet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriptionSnippet {
    pub resource_id: ResourceId,
}

impl InsertSubscription {
    pub fn new(channel_id: impl Into<ChannelId>) -> Self {
        Self {
            snippet: NewSubscriptionSnippet {
                resource_id: ResourceId::channel(channel_id.into()),
            },
        }
    }
}

impl Request for InsertSubscription {
    type Data = Self;
    type Response = Subscription;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        // The body is JSON, so `part` has to ride on the path
        "/subscriptions?part=snippet".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}
