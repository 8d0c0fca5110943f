use super::{ChannelId, PageInfo, ResourceId};
use crate::macros::setter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: ResourceId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: ChannelId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub channel_title: Option<String>,
}

// Requests

/// `GET /search?part=snippet&type=channel`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchChannels {
    part: String,
    q: String,
    #[serde(rename = "type")]
    resource_type: String,
    max_results: u32,
}

impl SearchChannels {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            part: "snippet".to_string(),
            q: term.into(),
            resource_type: "channel".to_string(),
            max_results: 5,
        }
    }

    setter!(max_results: u32);
}

impl Request for SearchChannels {
    type Data = Self;
    type Response = SearchListResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/search".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
    pub page_info: Option<PageInfo>,
}

impl SearchListResponse {
    /// Channel ids of the hits, in ranking order.
    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.items
            .iter()
            .map(|item| item.snippet.channel_id.clone())
            .collect()
    }
}
