use serde::{Deserialize, Serialize};

// GET /auth/google/callback (also the local consent listener)
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

// POST /subscribe
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(rename = "channelInput", default)]
    pub channel_input: String,
}

// Health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
