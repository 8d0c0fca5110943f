mod models;

pub use models::{Credential, SubscriptionResult};
