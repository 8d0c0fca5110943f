use crate::endpoints::{
    ChannelId, channels::ListChannels, search::SearchChannels,
    subscriptions::InsertSubscription,
};

pub struct ChannelRepository;

impl ChannelRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn by_id(&self, channel_id: impl Into<ChannelId>) -> ListChannels {
        ListChannels::new(channel_id)
    }
}

pub struct SearchRepository;

impl SearchRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn channels(&self, term: impl Into<String>) -> SearchChannels {
        SearchChannels::new(term)
    }
}

pub struct SubscriptionRepository;

impl SubscriptionRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn insert(&self, channel_id: impl Into<ChannelId>) -> InsertSubscription {
        InsertSubscription::new(channel_id)
    }
}
