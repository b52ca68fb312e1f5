//! Graph store connectivity probe.
//!
//! Writes a marker node and reads it back through an indexed predicate,
//! exercising the mutation and query paths end to end.

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use chatgraph_core::graph::store::GraphStore;
use chatgraph_types::graph::{GraphError, GraphQuery, Mutation};

pub const PROBE_NODE_NAME: &str = "Dgraph Test Entry";
pub const PROBE_SESSION_LINK: &str = "test-session-dgraph-debug";

const PROBE_QUERY: &str = r#"query getProbeNode($sessionLink: string) {
  probe(func: eq(ProbeNode.sessionLink, $sessionLink)) {
    uid
    ProbeNode.name
    ProbeNode.timestamp
    ProbeNode.sessionLink
  }
}"#;

#[derive(Debug, Deserialize)]
struct ProbeResult {
    #[serde(default)]
    probe: Vec<Value>,
}

/// Write a probe node and query it back.
pub async fn probe_graph<G: GraphStore>(store: &G) -> Result<String, GraphError> {
    let node = json!({
        "uid": "_:probe",
        "dgraph.type": "ProbeNode",
        "ProbeNode.name": PROBE_NODE_NAME,
        "ProbeNode.timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
        "ProbeNode.sessionLink": PROBE_SESSION_LINK,
    });
    let written = store
        .mutate(&Mutation::SetJson {
            query: None,
            set: node,
        })
        .await?;
    info!(uid = ?written.uids.get("probe"), "Probe node written");

    let query = GraphQuery::new(PROBE_QUERY).with_var("$sessionLink", PROBE_SESSION_LINK);
    let data = store.query(&query).await?;
    let result: ProbeResult = if data.is_null() {
        ProbeResult { probe: Vec::new() }
    } else {
        serde_json::from_value(data)
            .map_err(|e| GraphError::Deserialization(format!("invalid probe response: {e}")))?
    };

    let found = result
        .probe
        .into_iter()
        .next()
        .ok_or_else(|| GraphError::NotFound("probe node written but not found by query".to_string()))?;

    Ok(format!("Dgraph test successful! Found test node: {found}"))
}
