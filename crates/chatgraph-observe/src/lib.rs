//! Observability setup for chatgraph: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
