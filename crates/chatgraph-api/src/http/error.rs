//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatgraph_types::error::{ChatError, RepositoryError};
use chatgraph_types::graph::GraphError;
use chatgraph_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// A chat turn could not be completed.
    Chat(ChatError),
    /// History could not be read.
    Repository(RepositoryError),
    /// Direct graph store calls (schema, probe).
    Graph(GraphError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<GraphError> for AppError {
    fn from(e: GraphError) -> Self {
        AppError::Graph(e)
    }
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Chat(ChatError::ModelUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE")
            }
            AppError::Chat(ChatError::Model(LlmError::RateLimited)) => {
                (StatusCode::TOO_MANY_REQUESTS, "MODEL_RATE_LIMITED")
            }
            AppError::Chat(ChatError::Model(LlmError::InvalidRequest(_))) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Chat(ChatError::Model(_)) => (StatusCode::BAD_GATEWAY, "MODEL_ERROR"),
            AppError::Repository(_) => (StatusCode::BAD_GATEWAY, "HISTORY_ERROR"),
            AppError::Graph(GraphError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Graph(_) => (StatusCode::BAD_GATEWAY, "GRAPH_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Chat(e) => e.to_string(),
            AppError::Repository(e) => e.to_string(),
            AppError::Graph(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        } else {
            tracing::warn!(code, %message, "Request rejected");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
