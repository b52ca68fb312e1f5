//! Conversation orchestration and port trait definitions for chatgraph.
//!
//! This crate defines the "ports" (graph store, LLM provider, history
//! repository) that the infrastructure layer implements, plus the chat
//! service that sequences calls between them. It depends only on
//! `chatgraph-types` -- never on `chatgraph-infra` or any network crate.

pub mod chat;
pub mod graph;
pub mod greeting;
pub mod llm;
