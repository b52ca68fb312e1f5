//! Chat history persistence and conversation orchestration.
//!
//! `HistoryRepository` is the port the infrastructure layer implements to
//! store turns; `ChatService` runs a turn end to end on top of it.

pub mod projection;
pub mod repository;
pub mod service;
pub mod session_lock;
