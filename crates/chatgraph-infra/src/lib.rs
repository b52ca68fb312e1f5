//! Infrastructure layer for chatgraph.
//!
//! Contains implementations of the port traits defined in `chatgraph-core`:
//! a Dgraph HTTP client and the Dgraph-backed history repository, the schema
//! provisioner and connectivity probe, OpenAI-compatible LLM providers, and
//! the configuration loader.

pub mod config;
pub mod dgraph;
pub mod llm;
