//! Projection of stored history into model messages.

use chatgraph_types::chat::{ChatMessage, HistoryRole};
use chatgraph_types::llm::Message;
use tracing::warn;

/// Convert stored history into the role-tagged messages sent to the model.
///
/// Messages whose role is not system/user/assistant cannot be expressed to
/// the model; they are left out and each one is logged.
pub fn project_history(session_id: &str, history: &[ChatMessage]) -> Vec<Message> {
    history
        .iter()
        .filter_map(|msg| match &msg.role {
            HistoryRole::Known(role) => Some(Message::new(*role, msg.content.clone())),
            HistoryRole::Unrecognized(raw) => {
                warn!(
                    session_id = %session_id,
                    role = %raw,
                    uid = ?msg.uid,
                    "Dropping history message with unrecognized role from model context"
                );
                None
            }
        })
        .collect()
}
