//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/sessions/{id}/messages - Stored messages, oldest first
//! - POST /api/v1/sessions/{id}/clear    - Delete the session and its messages

use axum::Json;
use axum::extract::{Path, State};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use chatgraph_types::chat::{ChatMessage, ClearChatResponse};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Characters that cannot appear raw inside one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Href of a session's message listing, with the id encoded as one segment.
pub fn messages_link(session_id: &str) -> String {
    format!(
        "/api/v1/sessions/{}/messages",
        utf8_percent_encode(session_id, PATH_SEGMENT)
    )
}

/// GET /api/v1/sessions/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let timer = RequestTimer::start();
    let messages = state.chat_service.load_history(&session_id).await?;

    let link = messages_link(&session_id);
    Ok(Json(timer.finish(messages).with_link("self", &link)))
}

/// POST /api/v1/sessions/{id}/clear
///
/// Always 200: failures are reported through `success: false` in the body.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<ApiResponse<ClearChatResponse>> {
    let timer = RequestTimer::start();
    let response = state.chat_service.clear_session(&session_id).await;
    Json(timer.finish(response))
}
