//! Chat schema provisioning.

use tracing::info;

use chatgraph_core::graph::store::GraphStore;
use chatgraph_types::graph::GraphError;

/// Predicates and types for sessions, messages, and probe nodes.
pub const CHAT_SCHEMA: &str = r#"ChatSession.sessionID: string @index(exact) @upsert .
ChatSession.has_message: [uid] @reverse .
ChatMessage.role: string .
ChatMessage.content: string .
ChatMessage.timestamp: datetime @index(hour) .
ChatMessage.sessionRef: string @index(exact) .
in_session: uid @reverse .
ProbeNode.name: string .
ProbeNode.timestamp: datetime .
ProbeNode.sessionLink: string @index(exact) .

type ChatSession {
  ChatSession.sessionID
  ChatSession.has_message
}

type ChatMessage {
  ChatMessage.role
  ChatMessage.content
  ChatMessage.timestamp
  ChatMessage.sessionRef
  in_session
}

type ProbeNode {
  ProbeNode.name
  ProbeNode.timestamp
  ProbeNode.sessionLink
}
"#;

pub const SCHEMA_APPLIED: &str = "Dgraph schema applied successfully.";

/// Apply [`CHAT_SCHEMA`]. Safe to call repeatedly.
pub async fn apply_schema<G: GraphStore>(store: &G) -> Result<String, GraphError> {
    store.alter_schema(CHAT_SCHEMA).await?;
    info!("Dgraph schema applied");
    Ok(SCHEMA_APPLIED.to_string())
}
