//! HTTP request handlers

use super::types::{
    DialogueQuery, DialogueRequest, DialogueResponse, DialogueStatusResponse, ErrorResponse,
    MessageResponse, SessionResponse,
};
use super::AppState;
use crate::session::new_session_id;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dialogue turns and session management
        .route("/api/dialogue", post(process_dialogue).get(dialogue_status))
        // Session id issuance
        .route("/api/sessions", post(create_session))
        .with_state(state)
}

// ============================================================
// Dialogue
// ============================================================

async fn process_dialogue(
    State(state): State<AppState>,
    Json(req): Json<DialogueRequest>,
) -> Result<Json<DialogueResponse>, AppError> {
    let transcript = req
        .transcript
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Transcript is required".to_string()))?;
    let session_id = req
        .session_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Session ID is required".to_string()))?;

    let outcome = state.dialogue.handle_turn(&session_id, &transcript).await;

    Ok(Json(DialogueResponse {
        response: outcome.response,
        intent: outcome.intent,
        state: outcome.state.into(),
    }))
}

/// `?action=clear` drops one session (with `sessionId`) or all of them;
/// otherwise reports how many sessions are live.
async fn dialogue_status(
    State(state): State<AppState>,
    Query(query): Query<DialogueQuery>,
) -> Response {
    if query.action.as_deref() == Some("clear") {
        // An empty id means no id
        return match query.session_id.filter(|id| !id.is_empty()) {
            Some(session_id) => {
                state.dialogue.clear_session(&session_id).await;
                tracing::info!(session_id = %session_id, "Session cleared");
                let message = format!("Session {session_id} cleared");
                Json(MessageResponse::new(message)).into_response()
            }
            None => {
                state.dialogue.clear_all().await;
                tracing::info!("All sessions cleared");
                Json(MessageResponse::new("All sessions cleared")).into_response()
            }
        };
    }

    Json(DialogueStatusResponse {
        message: "Dialogue API".to_string(),
        active_sessions: state.dialogue.active_sessions().await,
    })
    .into_response()
}

// ============================================================
// Sessions
// ============================================================

async fn create_session() -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id: new_session_id(),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        tracing::warn!(status = %status, error = %message, "Rejected dialogue request");
        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
