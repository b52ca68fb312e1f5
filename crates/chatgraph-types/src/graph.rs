//! Graph store request/response types.
//!
//! Shapes exchanged with a Dgraph-style store: parameterized queries,
//! JSON set mutations (optionally inside an upsert block), N-Quad deletions,
//! and the uid map returned by a committed mutation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A parameterized read query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphQuery {
    pub query: String,
    /// Variable map; keys include the leading `$` (e.g. `"$sessionID"`).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, String>,
}

impl GraphQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: HashMap::new(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// A write applied and committed in a single transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// JSON "set" payload. When `query` is present the write runs as an
    /// upsert block and may reference query variables as `uid(var)`.
    SetJson {
        query: Option<String>,
        set: serde_json::Value,
    },
    /// N-Quad deletion statements, e.g. `<0x1> * * .`
    DeleteNquads(String),
}

/// Outcome of a committed mutation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationResponse {
    /// Blank-node label (without `_:`) to assigned uid.
    #[serde(default)]
    pub uids: HashMap<String, String>,
}

/// Errors from graph store operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph store request failed: {0}")]
    Transport(String),

    #[error("graph store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("graph store rejected the request: {0}")]
    Rejected(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_query_serializes_variables() {
        let q = GraphQuery::new("query q($id: string) { q(func: uid($id)) { uid } }")
            .with_var("$id", "0x1");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["variables"]["$id"], "0x1");
    }

    #[test]
    fn test_graph_query_omits_empty_variables() {
        let json = serde_json::to_value(GraphQuery::new("{ q() { uid } }")).unwrap();
        assert!(json.get("variables").is_none());
    }

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "graph store returned HTTP 503: unavailable");
    }
}
