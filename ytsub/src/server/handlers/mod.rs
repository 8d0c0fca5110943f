mod auth;
mod index;
mod pages;
mod subscribe;

pub use auth::{initiate_auth, logout, oauth_callback};
pub use index::index;
pub use pages::{privacy, terms};
pub use subscribe::subscribe;

use crate::server::models::HealthResponse;
use axum::Json;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
