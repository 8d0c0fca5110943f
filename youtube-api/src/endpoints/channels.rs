use super::ChannelId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub snippet: ChannelSnippet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub custom_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

// Requests

/// `GET /channels?part=snippet&id=...`
#[derive(Debug, Clone, Serialize)]
pub struct ListChannels {
    part: String,
    id: ChannelId,
}

impl ListChannels {
    pub fn new(channel_id: impl Into<ChannelId>) -> Self {
        Self {
            part: "snippet".to_string(),
            id: channel_id.into(),
        }
    }
}

impl Request for ListChannels {
    type Data = Self;
    type Response = ChannelListResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/channels".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelListResponse {
    // Omitted entirely by the API when nothing matched
    #[serde(default)]
    pub items: Vec<Channel>,
}

impl ChannelListResponse {
    pub fn into_first(self) -> Option<Channel> {
        self.items.into_iter().next()
    }
}
