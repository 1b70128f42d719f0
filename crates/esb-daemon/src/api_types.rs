//! JSON request/response bodies for the admin HTTP surface.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Current value of the global outgoing-feed kill switch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedFlagResponse {
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
