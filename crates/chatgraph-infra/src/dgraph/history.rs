//! Dgraph-backed [`HistoryRepository`].
//!
//! Storage layout: one `ChatSession` node per session id, keyed by
//! `ChatSession.sessionID`, and one `ChatMessage` node per message. Every
//! message carries its session id as the scalar `ChatMessage.sessionRef`
//! plus an `in_session` edge; the session links back through
//! `ChatSession.has_message`. Reads and deletes select on the scalar.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use chatgraph_core::chat::repository::HistoryRepository;
use chatgraph_core::graph::store::GraphStore;
use chatgraph_types::chat::{ChatMessage, ClearChatResponse, HistoryRole, MessageRole};
use chatgraph_types::error::RepositoryError;
use chatgraph_types::graph::{GraphError, GraphQuery, Mutation};

/// All messages of a session, oldest first.
pub const LOAD_QUERY: &str = r#"query getSessionMessages($sessionID: string) {
  messages(func: eq(ChatMessage.sessionRef, $sessionID), orderasc: ChatMessage.timestamp) {
    uid
    role: ChatMessage.role
    content: ChatMessage.content
    timestamp: ChatMessage.timestamp
  }
}"#;

/// Uids of the session node(s) and every message belonging to the session.
pub const SESSION_NODES_QUERY: &str = r#"query getSessionNodes($sessionID: string) {
  sessions(func: eq(ChatSession.sessionID, $sessionID)) {
    uid
    messages: ChatSession.has_message { uid }
  }
  messages(func: eq(ChatMessage.sessionRef, $sessionID)) {
    uid
  }
}"#;

#[derive(Debug, Deserialize)]
struct LoadResult {
    #[serde(default)]
    messages: Option<Vec<StoredMessage>>,
}

#[derive(Debug, Deserialize)]
struct StoredMessage {
    uid: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionNodesResult {
    #[serde(default)]
    sessions: Vec<SessionNode>,
    #[serde(default)]
    messages: Vec<UidRef>,
}

#[derive(Debug, Deserialize)]
struct SessionNode {
    uid: String,
    #[serde(default)]
    messages: Vec<UidRef>,
}

#[derive(Debug, Deserialize)]
struct UidRef {
    uid: String,
}

/// History repository over any [`GraphStore`].
pub struct DgraphHistoryRepository<G: GraphStore> {
    store: G,
}

impl<G: GraphStore> DgraphHistoryRepository<G> {
    pub fn new(store: G) -> Self {
        Self { store }
    }

    async fn collect_session_nodes(
        &self,
        session_id: &str,
    ) -> Result<(BTreeSet<String>, BTreeSet<String>), GraphError> {
        let query = GraphQuery::new(SESSION_NODES_QUERY).with_var("$sessionID", session_id);
        let data = self.store.query(&query).await?;
        let result: SessionNodesResult = if data.is_null() {
            SessionNodesResult::default()
        } else {
            serde_json::from_value(data)
                .map_err(|e| GraphError::Deserialization(format!("invalid session node listing: {e}")))?
        };

        let mut sessions = BTreeSet::new();
        let mut messages = BTreeSet::new();
        for session in result.sessions {
            messages.extend(session.messages.into_iter().map(|m| m.uid));
            sessions.insert(session.uid);
        }
        messages.extend(result.messages.into_iter().map(|m| m.uid));
        Ok((sessions, messages))
    }

    async fn try_clear(&self, session_id: &str) -> Result<Option<u32>, GraphError> {
        let (sessions, messages) = self.collect_session_nodes(session_id).await?;
        if sessions.is_empty() && messages.is_empty() {
            return Ok(None);
        }

        let nquads = build_delete_nquads(sessions.iter().chain(messages.iter()))?;
        self.store.mutate(&Mutation::DeleteNquads(nquads)).await?;
        Ok(Some(messages.len() as u32))
    }
}

/// Build the single committed write that stores `messages` for `session_id`.
///
/// The session node is addressed through an upsert block so an existing node
/// is reused and a missing one is created in the same transaction.
pub fn build_append_mutation(session_id: &str, messages: &[ChatMessage]) -> Mutation {
    // A JSON string literal is also a valid DQL string literal.
    let quoted = Value::String(session_id.to_string()).to_string();
    let upsert = format!("{{ session as var(func: eq(ChatSession.sessionID, {quoted})) }}");

    let message_nodes: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| {
            json!({
                "uid": format!("_:msg{i}"),
                "dgraph.type": "ChatMessage",
                "ChatMessage.role": m.role.to_string(),
                "ChatMessage.content": m.content,
                "ChatMessage.timestamp": m.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
                "ChatMessage.sessionRef": session_id,
                "in_session": { "uid": "uid(session)" },
            })
        })
        .collect();

    Mutation::SetJson {
        query: Some(upsert),
        set: json!([{
            "uid": "uid(session)",
            "dgraph.type": "ChatSession",
            "ChatSession.sessionID": session_id,
            "ChatSession.has_message": message_nodes,
        }]),
    }
}

/// One `<uid> * * .` statement per node. Rejects anything that is not a
/// Dgraph uid so the statements cannot be malformed.
pub fn build_delete_nquads<'a>(
    uids: impl IntoIterator<Item = &'a String>,
) -> Result<String, GraphError> {
    let mut lines = Vec::new();
    for uid in uids {
        if !is_valid_uid(uid) {
            return Err(GraphError::Deserialization(format!("invalid uid in graph response: {uid}")));
        }
        lines.push(format!("<{uid}> * * ."));
    }
    Ok(lines.join("\n"))
}

/// Position of a role within one turn. Unrecognized roles keep store order
/// after known ones.
fn turn_position(role: &HistoryRole) -> u8 {
    match role.known() {
        Some(MessageRole::System) => 0,
        Some(MessageRole::User) => 1,
        Some(MessageRole::Assistant) => 2,
        None => 3,
    }
}

fn is_valid_uid(uid: &str) -> bool {
    uid.strip_prefix("0x")
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

impl<G: GraphStore> HistoryRepository for DgraphHistoryRepository<G> {
    async fn load_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        let query = GraphQuery::new(LOAD_QUERY).with_var("$sessionID", session_id);
        let data = self
            .store
            .query(&query)
            .await
            .map_err(|source| RepositoryError::Load {
                session_id: session_id.to_string(),
                source,
            })?;

        if data.is_null() {
            return Ok(Vec::new());
        }

        let result: LoadResult =
            serde_json::from_value(data.clone()).map_err(|e| RepositoryError::Decode {
                session_id: session_id.to_string(),
                reason: e.to_string(),
                json: data.to_string(),
            })?;

        let mut history: Vec<ChatMessage> = result
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| {
                let timestamp = m.timestamp.unwrap_or_else(|| {
                    warn!(session_id = %session_id, uid = %m.uid, "Stored message has no timestamp, ordering it first");
                    DateTime::<Utc>::default()
                });
                ChatMessage {
                    uid: Some(m.uid),
                    role: HistoryRole::from(m.role.unwrap_or_default()),
                    content: m.content.unwrap_or_default(),
                    timestamp,
                    session_ref: session_id.to_string(),
                }
            })
            .collect();

        // Both messages of a turn share a timestamp; the role breaks the tie.
        history.sort_by_key(|m| (m.timestamp, turn_position(&m.role)));

        debug!(session_id = %session_id, count = history.len(), "Loaded chat history");
        Ok(history)
    }

    async fn append_messages(
        &self,
        session_id: &str,
        messages: &[ChatMessage],
    ) -> Result<(), RepositoryError> {
        if messages.is_empty() {
            return Err(RepositoryError::EmptyBatch(session_id.to_string()));
        }

        let mutation = build_append_mutation(session_id, messages);
        let response = self.store.mutate(&mutation).await.map_err(|source| {
            let payload = match &mutation {
                Mutation::SetJson { set, .. } => set.to_string(),
                Mutation::DeleteNquads(nquads) => nquads.clone(),
            };
            RepositoryError::Append {
                session_id: session_id.to_string(),
                payload,
                source,
            }
        })?;

        debug!(
            session_id = %session_id,
            count = messages.len(),
            uids = ?response.uids,
            "Appended chat messages"
        );
        Ok(())
    }

    async fn clear_session(&self, session_id: &str) -> ClearChatResponse {
        match self.try_clear(session_id).await {
            Ok(None) => {
                info!(session_id = %session_id, "No chat history to clear");
                ClearChatResponse::cleared(
                    format!("No chat history found for session {session_id}; nothing to clear."),
                    0,
                )
            }
            Ok(Some(deleted)) => {
                info!(session_id = %session_id, deleted, "Chat history cleared");
                ClearChatResponse::cleared(
                    format!("Chat history cleared for session {session_id}: {deleted} messages deleted."),
                    deleted,
                )
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Failed to clear chat history");
                ClearChatResponse::failed(format!("Failed to clear chat history from Dgraph: {e}"))
            }
        }
    }
}
