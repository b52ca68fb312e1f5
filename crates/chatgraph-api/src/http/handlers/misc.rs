//! Greeting and liveness handlers.

use axum::Json;
use axum::extract::Query;
use serde::{Deserialize, Serialize};

use chatgraph_core::greeting::say_hello;

use crate::http::response::{ApiResponse, RequestTimer};

/// A single human-readable message.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct HelloQuery {
    pub name: Option<String>,
}

/// GET /api/v1/hello?name=
pub async fn hello(Query(query): Query<HelloQuery>) -> Json<ApiResponse<MessageBody>> {
    let timer = RequestTimer::start();
    Json(timer.finish(MessageBody {
        message: say_hello(query.name.as_deref()),
    }))
}

/// GET /api/v1/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
