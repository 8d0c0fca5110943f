use youtube_api::endpoints::ChannelId;

use super::ChannelApi;
use crate::common::SubscriptionResult;
use crate::error::SubscribeError;

/// Subscribe the authorized user to `channel_id`.
///
/// The channel is looked up first so that unknown ids fail before anything
/// is written; the reported title comes from that lookup, not from the insert
/// response.
pub async fn subscribe<A: ChannelApi>(
    channel_id: &ChannelId,
    api: &A,
) -> Result<SubscriptionResult, SubscribeError> {
    let channel = api
        .find_channel(channel_id)
        .await?
        .ok_or_else(|| SubscribeError::NotFound(channel_id.clone()))?;

    api.insert_subscription(channel_id).await?;

    tracing::info!(
        channel_id = %channel_id,
        channel_title = %channel.snippet.title,
        "Subscribed to channel"
    );

    Ok(SubscriptionResult {
        success: true,
        channel_title: channel.snippet.title,
    })
}
