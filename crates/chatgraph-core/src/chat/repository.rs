//! HistoryRepository trait definition.
//!
//! Loads, appends, and clears the stored messages of one session.

use chatgraph_types::chat::{ChatMessage, ClearChatResponse};
use chatgraph_types::error::RepositoryError;

/// Repository trait for session-scoped chat history.
///
/// Implementations live in chatgraph-infra (e.g., `DgraphHistoryRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait HistoryRepository: Send + Sync {
    /// All messages of a session in non-decreasing timestamp order.
    ///
    /// An unknown session yields an empty list, not an error.
    fn load_history(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Persist new messages for a session in a single committed write,
    /// creating the session record if it does not exist yet.
    fn append_messages(
        &self,
        session_id: &str,
        messages: &[ChatMessage],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a session and all of its messages.
    ///
    /// Never fails hard: errors are reported in the returned response.
    /// Clearing a session with no data succeeds.
    fn clear_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = ClearChatResponse> + Send;
}
