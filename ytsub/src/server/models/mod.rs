mod requests;
mod session;

pub use requests::{CallbackParams, HealthResponse, SubscribeForm};
pub use session::BrowserSession;
