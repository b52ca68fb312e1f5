//! Chat service orchestrating a conversation turn.
//!
//! ChatService gives a stateless completion API multi-turn memory: it loads
//! the session's stored history, sends it plus the new user message to the
//! configured model, and persists the new turn for next time.

use chatgraph_types::chat::{ChatMessage, ChatResponse, ClearChatResponse, MessageRole};
use chatgraph_types::config::ChatConfig;
use chatgraph_types::error::{ChatError, RepositoryError};
use chatgraph_types::llm::CompletionRequest;
use chrono::Utc;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::chat::projection::project_history;
use crate::chat::repository::HistoryRepository;
use crate::chat::session_lock::SessionLocks;
use crate::llm::registry::ModelRegistry;

/// Runs chat turns against a history repository and a model registry.
///
/// Generic over `HistoryRepository` to maintain clean architecture
/// (chatgraph-core never depends on chatgraph-infra).
pub struct ChatService<H: HistoryRepository> {
    history: H,
    models: ModelRegistry,
    config: ChatConfig,
    locks: SessionLocks,
}

impl<H: HistoryRepository> ChatService<H> {
    pub fn new(history: H, models: ModelRegistry, config: ChatConfig) -> Self {
        Self {
            history,
            models,
            config,
            locks: SessionLocks::new(),
        }
    }

    /// Run one conversation turn and return the trimmed model reply.
    ///
    /// Model resolution and invocation failures fail the turn. History
    /// failures only degrade memory: a failed load starts the session fresh,
    /// and a failed save is logged while the reply is still returned.
    pub async fn chat(
        &self,
        session_id: &str,
        user_message: &str,
    ) -> Result<ChatResponse, ChatError> {
        let model_name = &self.config.model;
        let model = self
            .models
            .get(model_name)
            .ok_or_else(|| ChatError::ModelUnavailable(model_name.clone()))?;

        let _turn = self.locks.acquire(session_id).await;

        // Both messages of the turn share one instant; loading orders them
        // by role within it.
        let turn_at = Utc::now();

        let mut history = match self.history.load_history(session_id).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Failed to load history, treating as new session");
                Vec::new()
            }
        };

        if history.is_empty() {
            history.push(ChatMessage::new(
                session_id,
                MessageRole::System,
                self.config.default_system_prompt.clone(),
                turn_at,
            ));
        }

        let user_record = ChatMessage::new(session_id, MessageRole::User, user_message, turn_at);
        history.push(user_record.clone());

        debug!(session_id = %session_id, messages = history.len(), "Effective history for model");
        for msg in &history {
            debug!(
                session_id = %session_id,
                role = %msg.role,
                content_len = msg.content.len(),
                timestamp = %msg.timestamp.to_rfc3339(),
                "History entry"
            );
        }

        let request = CompletionRequest {
            model: String::new(),
            messages: project_history(session_id, &history),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = model.name(),
            gen_ai.request.model = model.default_model(),
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.max_tokens = ?request.max_tokens,
            session_id = %session_id,
        );

        let response = model.complete(&request).instrument(span).await?;
        let reply = response.content.trim().to_string();

        info!(
            session_id = %session_id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            "Model replied"
        );

        let assistant_record =
            ChatMessage::new(session_id, MessageRole::Assistant, reply.clone(), turn_at);
        if let Err(e) = self
            .history
            .append_messages(session_id, &[user_record, assistant_record])
            .await
        {
            error!(
                session_id = %session_id,
                error = %e,
                "Failed to save turn; subsequent history will be incomplete"
            );
        }

        Ok(ChatResponse { content: reply })
    }

    /// Stored messages for a session, oldest first.
    pub async fn load_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.history.load_history(session_id).await
    }

    /// Delete a session and all its messages.
    ///
    /// Waits for any in-flight turn on the session so a concurrent save
    /// cannot resurrect part of it.
    pub async fn clear_session(&self, session_id: &str) -> ClearChatResponse {
        let _turn = self.locks.acquire(session_id).await;
        let response = self.history.clear_session(session_id).await;
        if response.success {
            info!(session_id = %session_id, deleted = response.deleted_messages, "Session cleared");
        } else {
            warn!(session_id = %session_id, message = %response.message, "Session clear failed");
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chatgraph_types::chat::HistoryRole;
    use chatgraph_types::graph::GraphError;
    use chatgraph_types::llm::{CompletionResponse, LlmError, Message, StopReason, Usage};

    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::provider::LlmProvider;

    // -----------------------------------------------------------------------
    // MockHistory: in-memory history with failure switches
    // -----------------------------------------------------------------------

    #[derive(Clone, Default)]
    struct MockHistory {
        stored: Arc<Mutex<Vec<ChatMessage>>>,
        fail_load: bool,
        fail_append: bool,
    }

    impl MockHistory {
        fn stored(&self) -> Vec<ChatMessage> {
            self.stored.lock().unwrap().clone()
        }
    }

    impl HistoryRepository for MockHistory {
        async fn load_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
            if self.fail_load {
                return Err(RepositoryError::Load {
                    session_id: session_id.to_string(),
                    source: GraphError::Transport("connection refused".to_string()),
                });
            }
            let mut messages: Vec<ChatMessage> = self
                .stored
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.session_ref == session_id)
                .cloned()
                .collect();
            messages.sort_by_key(|m| m.timestamp);
            Ok(messages)
        }

        async fn append_messages(
            &self,
            session_id: &str,
            messages: &[ChatMessage],
        ) -> Result<(), RepositoryError> {
            if self.fail_append {
                return Err(RepositoryError::Append {
                    session_id: session_id.to_string(),
                    payload: "[]".to_string(),
                    source: GraphError::Transport("connection refused".to_string()),
                });
            }
            self.stored.lock().unwrap().extend(messages.iter().cloned());
            Ok(())
        }

        async fn clear_session(&self, session_id: &str) -> ClearChatResponse {
            let mut stored = self.stored.lock().unwrap();
            let before = stored.len();
            stored.retain(|m| m.session_ref != session_id);
            let removed = (before - stored.len()) as u32;
            ClearChatResponse::cleared(format!("{removed} messages deleted"), removed)
        }
    }

    // -----------------------------------------------------------------------
    // MockProvider: records every request, replies with a fixed script
    // -----------------------------------------------------------------------

    #[derive(Clone)]
    struct MockProvider {
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        replies: Arc<Mutex<Vec<String>>>,
        fail: bool,
        delay: Duration,
    }

    impl MockProvider {
        fn replying(replies: &[&str]) -> Self {
            Self {
                requests: Arc::new(Mutex::new(Vec::new())),
                replies: Arc::new(Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect())),
                fail: false,
                delay: Duration::ZERO,
            }
        }

        fn slow(replies: &[&str], delay: Duration) -> Self {
            Self {
                delay,
                ..Self::replying(replies)
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::replying(&[])
            }
        }

        fn sent_messages(&self, call: usize) -> Vec<Message> {
            self.requests.lock().unwrap()[call].messages.clone()
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn default_model(&self) -> &str {
            "mock-model"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(LlmError::Provider {
                    message: "HTTP 500: upstream exploded".to_string(),
                });
            }
            let content = self.replies.lock().unwrap().pop().unwrap_or_default();
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content,
                model: "mock-model".to_string(),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            })
        }
    }

    fn service(history: MockHistory, provider: MockProvider) -> ChatService<MockHistory> {
        let mut models = ModelRegistry::new();
        models.register("google-gemini", BoxLlmProvider::new(provider));
        ChatService::new(history, models, ChatConfig::default())
    }

    #[tokio::test]
    async fn test_first_turn_seeds_system_prompt_and_stores_two_messages() {
        let history = MockHistory::default();
        let provider = MockProvider::replying(&["  Hello there!\n"]);
        let svc = service(history.clone(), provider.clone());

        let reply = svc.chat("s1", "hi").await.unwrap();
        assert_eq!(reply.content, "Hello there!");

        assert_eq!(
            provider.sent_messages(0),
            vec![
                Message::new(MessageRole::System, "You are a helpful assistant"),
                Message::new(MessageRole::User, "hi"),
            ]
        );

        let stored = history.stored();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].role, HistoryRole::Known(MessageRole::User));
        assert_eq!(stored[0].content, "hi");
        assert_eq!(stored[1].role, HistoryRole::Known(MessageRole::Assistant));
        assert_eq!(stored[1].content, "Hello there!");
        assert!(stored.iter().all(|m| m.session_ref == "s1" && m.uid.is_none()));
    }

    #[tokio::test]
    async fn test_second_turn_replays_history_without_system_prompt() {
        let history = MockHistory::default();
        let provider = MockProvider::replying(&["reply one", "reply two"]);
        let svc = service(history.clone(), provider.clone());

        svc.chat("s1", "hi").await.unwrap();
        let second = svc.chat("s1", "again").await.unwrap();
        assert_eq!(second.content, "reply two");

        assert_eq!(
            provider.sent_messages(1),
            vec![
                Message::new(MessageRole::User, "hi"),
                Message::new(MessageRole::Assistant, "reply one"),
                Message::new(MessageRole::User, "again"),
            ]
        );
        assert_eq!(history.stored().len(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_are_serialized() {
        let history = MockHistory::default();
        let provider = MockProvider::slow(&["reply one", "reply two"], Duration::from_millis(20));
        let svc = service(history.clone(), provider.clone());

        let (first, second) = tokio::join!(svc.chat("s1", "one"), svc.chat("s1", "two"));
        assert_eq!(first.unwrap().content, "reply one");
        assert_eq!(second.unwrap().content, "reply two");

        assert_eq!(
            provider.sent_messages(1),
            vec![
                Message::new(MessageRole::User, "one"),
                Message::new(MessageRole::Assistant, "reply one"),
                Message::new(MessageRole::User, "two"),
            ]
        );
        assert_eq!(history.stored().len(), 4);
    }

    #[tokio::test]
    async fn test_turn_messages_share_timestamp_after_prior_history() {
        let history = MockHistory::default();
        let provider = MockProvider::replying(&["one", "two"]);
        let svc = service(history.clone(), provider);

        svc.chat("s1", "first").await.unwrap();
        svc.chat("s1", "second").await.unwrap();

        let stored = history.stored();
        assert_eq!(stored[0].timestamp, stored[1].timestamp);
        assert_eq!(stored[2].timestamp, stored[3].timestamp);
        assert!(stored[3].timestamp >= stored[1].timestamp);

        let loaded = svc.load_history("s1").await.unwrap();
        let contents: Vec<&str> = loaded.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "one", "second", "two"]);
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_fresh_session() {
        let history = MockHistory {
            fail_load: true,
            ..Default::default()
        };
        let provider = MockProvider::replying(&["still here"]);
        let svc = service(history.clone(), provider.clone());

        let reply = svc.chat("s1", "hi").await.unwrap();
        assert_eq!(reply.content, "still here");
        assert_eq!(
            provider.sent_messages(0),
            vec![
                Message::new(MessageRole::System, "You are a helpful assistant"),
                Message::new(MessageRole::User, "hi"),
            ]
        );
    }

    #[tokio::test]
    async fn test_append_failure_still_returns_reply() {
        let history = MockHistory {
            fail_append: true,
            ..Default::default()
        };
        let provider = MockProvider::replying(&["answer"]);
        let svc = service(history.clone(), provider);

        let reply = svc.chat("s1", "hi").await.unwrap();
        assert_eq!(reply.content, "answer");
        assert!(history.stored().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_fails_turn_and_stores_nothing() {
        let history = MockHistory::default();
        let svc = service(history.clone(), MockProvider::failing());

        let err = svc.chat("s1", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Model(LlmError::Provider { .. })));
        assert!(history.stored().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_model_fails_turn() {
        let history = MockHistory::default();
        let provider = MockProvider::replying(&["never"]);
        let mut config = ChatConfig::default();
        config.model = "missing-model".to_string();
        let mut models = ModelRegistry::new();
        models.register("google-gemini", BoxLlmProvider::new(provider.clone()));
        let svc = ChatService::new(history.clone(), models, config);

        let err = svc.chat("s1", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::ModelUnavailable(ref name) if name == "missing-model"));
        assert!(provider.requests.lock().unwrap().is_empty());
        assert!(history.stored().is_empty());
    }

    #[tokio::test]
    async fn test_request_uses_configured_temperature() {
        let provider = MockProvider::replying(&["ok"]);
        let svc = service(MockHistory::default(), provider.clone());

        svc.chat("s1", "hi").await.unwrap();
        let request = provider.requests.lock().unwrap()[0].clone();
        assert_eq!(request.temperature, Some(0.7));
        assert!(request.model.is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_stored_role_is_not_sent() {
        let history = MockHistory::default();
        let mut odd = ChatMessage::new("s1", MessageRole::User, "tool output", Utc::now());
        odd.role = HistoryRole::Unrecognized("tool".to_string());
        history.stored.lock().unwrap().push(odd);

        let provider = MockProvider::replying(&["ok"]);
        let svc = service(history, provider.clone());
        svc.chat("s1", "hi").await.unwrap();

        // History was non-empty, so no system prompt; the odd record is dropped.
        assert_eq!(
            provider.sent_messages(0),
            vec![Message::new(MessageRole::User, "hi")]
        );
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let history = MockHistory::default();
        let provider = MockProvider::replying(&["a", "b"]);
        let svc = service(history, provider.clone());

        svc.chat("s1", "hi").await.unwrap();
        svc.chat("s2", "hello").await.unwrap();

        assert_eq!(provider.sent_messages(1)[0].role, MessageRole::System);
    }

    #[tokio::test]
    async fn test_clear_session_delegates_to_repository() {
        let history = MockHistory::default();
        let svc = service(history.clone(), MockProvider::replying(&["a"]));
        svc.chat("s1", "hi").await.unwrap();

        let response = svc.clear_session("s1").await;
        assert!(response.success);
        assert_eq!(response.deleted_messages, 2);
        assert!(history.stored().is_empty());
    }
}
