//! HTTP request handlers grouped by resource.

pub mod chat;
pub mod graph;
pub mod misc;
pub mod session;
