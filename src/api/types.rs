//! API request and response types

use crate::dialogue::{Intent, StateSnapshot};
use serde::{Deserialize, Serialize};

/// Request to process one transcript
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueRequest {
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Reply for a processed transcript
#[derive(Debug, Serialize)]
pub struct DialogueResponse {
    pub response: String,
    pub intent: Intent,
    /// Session state after the turn, for debugging clients
    pub state: StateSnapshot,
}

/// Query for the management endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueQuery {
    pub action: Option<String>,
    pub session_id: Option<String>,
}

/// Status of the dialogue endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueStatusResponse {
    pub message: String,
    pub active_sessions: usize,
}

/// Response for session creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
