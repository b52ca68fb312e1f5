//! Graph store administration handlers.
//!
//! - POST /api/v1/schema - Apply the chat schema
//! - POST /api/v1/probe  - Write and read back a probe node

use axum::Json;
use axum::extract::State;

use chatgraph_infra::dgraph::probe::probe_graph;
use chatgraph_infra::dgraph::schema::apply_schema;

use super::misc::MessageBody;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

pub async fn apply(State(state): State<AppState>) -> Result<Json<ApiResponse<MessageBody>>, AppError> {
    let timer = RequestTimer::start();
    let message = apply_schema(&*state.graph).await?;
    Ok(Json(timer.finish(MessageBody { message })))
}

pub async fn probe(State(state): State<AppState>) -> Result<Json<ApiResponse<MessageBody>>, AppError> {
    let timer = RequestTimer::start();
    let message = probe_graph(&*state.graph).await?;
    Ok(Json(timer.finish(MessageBody { message })))
}
