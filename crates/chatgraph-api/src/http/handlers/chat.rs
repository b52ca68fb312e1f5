//! Chat HTTP handler.
//!
//! - POST /api/v1/chat - Run one conversation turn

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use chatgraph_types::chat::ChatResponse;

use crate::http::error::AppError;
use crate::http::handlers::session::messages_link;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// POST /api/v1/chat - Send a message and receive the model's reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, AppError> {
    let timer = RequestTimer::start();
    tracing::debug!(request_id = timer.request_id(), session_id = %body.session_id, "Chat request");

    let response = state
        .chat_service
        .chat(&body.session_id, &body.message)
        .await?;

    let link = messages_link(&body.session_id);
    Ok(Json(timer.finish(response).with_link("history", &link)))
}
