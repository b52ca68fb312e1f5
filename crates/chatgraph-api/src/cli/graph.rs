//! Graph store CLI commands: apply-schema, probe.

use anyhow::{Context, Result};
use console::style;
use serde_json::json;

use chatgraph_infra::dgraph::probe::probe_graph;
use chatgraph_infra::dgraph::schema::apply_schema;

use crate::state::AppState;

pub async fn apply(state: &AppState, json: bool) -> Result<()> {
    let message = apply_schema(&*state.graph)
        .await
        .with_context(|| format!("Failed to apply schema to '{}'", state.graph.connection_name()))?;
    print_message(&message, json)
}

pub async fn probe(state: &AppState, json: bool) -> Result<()> {
    let message = probe_graph(&*state.graph)
        .await
        .with_context(|| format!("Dgraph probe against {} failed", state.graph.endpoint()))?;
    print_message(&message, json)
}

pub(crate) fn print_message(message: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&json!({ "message": message }))?);
    } else {
        println!();
        println!("  {} {}", style("✓").green().bold(), message);
        println!();
    }
    Ok(())
}
