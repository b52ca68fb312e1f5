//! Shared domain types for chatgraph.
//!
//! Chat history records, LLM request/response shapes, graph-store mutation
//! payloads, configuration, and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
