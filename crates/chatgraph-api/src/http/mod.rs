//! HTTP/REST API layer for chatgraph.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and CORS
//! support. Authentication is left to the hosting environment.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
