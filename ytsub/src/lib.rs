// Types shared by both variants
pub mod common;

// OAuth2 client, credential stores and the authorizer
pub mod auth;

// Channel resolution and the subscribe call
pub mod channel;

mod error;
pub mod logging;

pub use common::{Credential, SubscriptionResult};
pub use error::{AuthError, ResolutionError, SubscribeError};

// Session variant (ytsub-server)
pub mod server;

// File variant (ytsub-local)
pub mod local;
