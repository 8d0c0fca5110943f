use percent_encoding::percent_decode_str;
use url::Url;
use youtube_api::endpoints::ChannelId;

use super::ChannelApi;
use crate::error::{ResolutionError, SubscribeError};

pub const DEFAULT_PLATFORM_DOMAIN: &str = "youtube.com";

/// How a piece of user input will be turned into a channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// `/channel/<id>`: taken as-is, no API call.
    Direct(ChannelId),
    /// `/@<handle>`
    Handle(String),
    /// `/c/<name>` or `/user/<name>`
    LegacyName(String),
    /// Anything else: search with the whole input.
    Search(String),
}

pub struct ChannelResolver {
    platform_domain: String,
}

impl Default for ChannelResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM_DOMAIN)
    }
}

impl ChannelResolver {
    pub fn new(platform_domain: impl Into<String>) -> Self {
        Self {
            platform_domain: platform_domain.into(),
        }
    }

    /// Search plans carry the input exactly as entered; only URL detection
    /// ignores surrounding whitespace.
    pub fn plan(&self, input: &str) -> ResolutionPlan {
        let search = || ResolutionPlan::Search(input.to_string());

        let Ok(url) = Url::parse(input.trim()) else {
            return search();
        };

        let on_platform = url
            .host_str()
            .is_some_and(|host| host.contains(&self.platform_domain));
        if !on_platform {
            return search();
        }

        let segments: Vec<String> = url
            .path_segments()
            .map(|segments| {
                segments
                    .map(|segment| percent_decode_str(segment).decode_utf8_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let first = segments.first().map(String::as_str).unwrap_or_default();
        let second = segments
            .get(1)
            .map(String::as_str)
            .filter(|segment| !segment.is_empty());

        match (first, second) {
            ("channel", Some(id)) => ResolutionPlan::Direct(ChannelId::new(id)),
            ("c" | "user", Some(name)) => ResolutionPlan::LegacyName(name.to_string()),
            (handle, _) if handle.len() > 1 && handle.starts_with('@') => {
                ResolutionPlan::Handle(handle[1..].to_string())
            }
            _ => search(),
        }
    }

    /// Resolve input to a channel id.
    ///
    /// A failed handle or legacy-name lookup (no hits or an API error) falls
    /// back to searching for the full input, and the outcome of that second
    /// search is what gets reported.
    pub async fn resolve<A: ChannelApi>(
        &self,
        input: &str,
        api: &A,
    ) -> Result<ChannelId, SubscribeError> {
        if input.trim().is_empty() {
            return Err(ResolutionError::EmptyInput.into());
        }

        let plan = self.plan(input);
        tracing::debug!(plan = ?plan, "Resolving channel input");

        match plan {
            ResolutionPlan::Direct(channel_id) => Ok(channel_id),
            ResolutionPlan::Handle(alias) | ResolutionPlan::LegacyName(alias) => {
                match search_first(api, &alias).await {
                    Ok(channel_id) => Ok(channel_id),
                    Err(e) => {
                        tracing::warn!(
                            alias = %alias,
                            error = %e,
                            "Alias lookup failed, searching with full input"
                        );
                        search_first(api, input).await
                    }
                }
            }
            ResolutionPlan::Search(term) => search_first(api, &term).await,
        }
    }
}

async fn search_first<A: ChannelApi>(api: &A, term: &str) -> Result<ChannelId, SubscribeError> {
    api.search_channels(term, 1)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ResolutionError::NotFound.into())
}
