use thiserror::Error;

use crate::graph::GraphError;
use crate::llm::LlmError;

/// Errors from history repository operations (used by trait definitions in chatgraph-core).
///
/// Every variant carries the session it was working on.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to load history for session {session_id}: {source}")]
    Load {
        session_id: String,
        #[source]
        source: GraphError,
    },

    #[error("failed to decode history for session {session_id}: {reason}. JSON: {json}")]
    Decode {
        session_id: String,
        reason: String,
        json: String,
    },

    #[error("failed to append messages for session {session_id}: {source}. Payload: {payload}")]
    Append {
        session_id: String,
        payload: String,
        #[source]
        source: GraphError,
    },

    #[error("nothing to append for session {0}")]
    EmptyBatch(String),
}

/// Errors that fail a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("model '{0}' is not available")]
    ModelUnavailable(String),

    #[error("model invocation failed: {0}")]
    Model(#[from] LlmError),
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown provider '{provider}' for model '{model}' (set base_url for custom providers)")]
    UnknownProvider { model: String, provider: String },

    #[error("missing API key for model '{model}': environment variable {env} is not set")]
    MissingApiKey { model: String, env: String },
}
