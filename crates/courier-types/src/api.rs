use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MessageKind;

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct PostTextRequest {
    #[serde(default)]
    pub content: String,
}

/// Generic acknowledgement body for the write endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}
