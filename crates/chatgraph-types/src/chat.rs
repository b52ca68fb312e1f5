//! Chat history types for chatgraph.
//!
//! A conversation is identified only by its caller-supplied session id.
//! Messages carry that id as a plain scalar (`session_ref`) and are ordered
//! solely by their UTC timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

pub use crate::llm::MessageRole;

/// Role of a stored history message.
///
/// Records written by this program always carry a known [`MessageRole`], but
/// the graph store may hold anything. Unknown values are preserved verbatim
/// so the orchestrator can report them instead of losing them on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HistoryRole {
    Known(MessageRole),
    Unrecognized(String),
}

impl HistoryRole {
    /// The known role, if this is one.
    pub fn known(&self) -> Option<MessageRole> {
        match self {
            HistoryRole::Known(role) => Some(*role),
            HistoryRole::Unrecognized(_) => None,
        }
    }
}

impl From<MessageRole> for HistoryRole {
    fn from(role: MessageRole) -> Self {
        HistoryRole::Known(role)
    }
}

impl From<String> for HistoryRole {
    fn from(raw: String) -> Self {
        match raw.parse::<MessageRole>() {
            Ok(role) => HistoryRole::Known(role),
            Err(_) => HistoryRole::Unrecognized(raw),
        }
    }
}

impl From<HistoryRole> for String {
    fn from(role: HistoryRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for HistoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRole::Known(role) => role.fmt(f),
            HistoryRole::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// One turn in a conversation as stored in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Node id assigned by the graph store; `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub role: HistoryRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub session_ref: String,
}

impl ChatMessage {
    /// Build an unpersisted message for `session_id`.
    pub fn new(
        session_id: impl Into<String>,
        role: MessageRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            uid: None,
            role: HistoryRole::Known(role),
            content: content.into(),
            timestamp,
            session_ref: session_id.into(),
        }
    }
}

/// Result of a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}

/// Structured outcome of clearing a session.
///
/// Clearing never fails hard: errors are reported through `success = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearChatResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub deleted_messages: u32,
}

impl ClearChatResponse {
    pub fn cleared(message: impl Into<String>, deleted_messages: u32) -> Self {
        Self {
            success: true,
            message: message.into(),
            deleted_messages,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            deleted_messages: 0,
        }
    }
}
