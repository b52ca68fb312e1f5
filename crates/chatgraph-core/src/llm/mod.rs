//! LLM provider abstractions for chatgraph.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `ModelRegistry`: name-indexed lookup of configured models

pub mod box_provider;
pub mod provider;
pub mod registry;
