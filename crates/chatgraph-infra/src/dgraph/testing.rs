//! In-memory [`GraphStore`] used by the Dgraph module tests.
//!
//! Understands exactly the queries and mutations this crate issues: queries
//! are recognised by their operation name, set payloads are applied as nested
//! JSON objects (blank nodes, `uid(session)` upsert bindings, edges), and
//! deletions are `<uid> * * .` statements.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value, json};

use chatgraph_core::graph::store::GraphStore;
use chatgraph_types::graph::{GraphError, GraphQuery, Mutation, MutationResponse};

#[derive(Default)]
struct State {
    nodes: BTreeMap<String, Map<String, Value>>,
    next_uid: u64,
    mutations: Vec<Mutation>,
    queries: Vec<GraphQuery>,
    schemas: Vec<String>,
}

impl State {
    fn allocate(&mut self) -> String {
        self.next_uid += 1;
        let uid = format!("0x{:x}", self.next_uid);
        self.nodes.insert(uid.clone(), Map::new());
        uid
    }

    fn find(&self, dgraph_type: &str, predicate: &str, value: &str) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|(_, node)| {
                node.get("dgraph.type").and_then(Value::as_str) == Some(dgraph_type)
                    && node.get(predicate).and_then(Value::as_str) == Some(value)
            })
            .map(|(uid, _)| uid.clone())
            .collect()
    }
}

#[derive(Default)]
pub(crate) struct FakeGraph {
    state: Mutex<State>,
    /// Returned verbatim from every query when set.
    canned: Mutex<Option<Value>>,
    pub fail_query: AtomicBool,
    pub fail_mutate: AtomicBool,
    pub fail_alter: AtomicBool,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canned_response(data: Value) -> Self {
        let fake = Self::default();
        *fake.canned.lock().unwrap() = Some(data);
        fake
    }

    pub fn fail_queries(self) -> Self {
        self.fail_query.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_mutations(self) -> Self {
        self.fail_mutate.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_alters(self) -> Self {
        self.fail_alter.store(true, Ordering::SeqCst);
        self
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().unwrap().mutations.clone()
    }

    pub fn queries(&self) -> Vec<GraphQuery> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn schemas(&self) -> Vec<String> {
        self.state.lock().unwrap().schemas.clone()
    }

    pub fn count_of_type(&self, dgraph_type: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .nodes
            .values()
            .filter(|n| n.get("dgraph.type").and_then(Value::as_str) == Some(dgraph_type))
            .count()
    }

    fn answer(&self, query: &GraphQuery) -> Value {
        let state = self.state.lock().unwrap();
        let var = |name: &str| query.variables.get(name).cloned().unwrap_or_default();

        if query.query.contains("getSessionMessages") {
            let sid = var("$sessionID");
            let mut messages: Vec<Value> = state
                .find("ChatMessage", "ChatMessage.sessionRef", &sid)
                .into_iter()
                .map(|uid| {
                    let node = &state.nodes[&uid];
                    json!({
                        "uid": uid,
                        "role": node.get("ChatMessage.role"),
                        "content": node.get("ChatMessage.content"),
                        "timestamp": node.get("ChatMessage.timestamp"),
                    })
                })
                .collect();
            messages.sort_by(|a, b| {
                a["timestamp"]
                    .as_str()
                    .unwrap_or_default()
                    .cmp(b["timestamp"].as_str().unwrap_or_default())
            });
            json!({ "messages": messages })
        } else if query.query.contains("getSessionNodes") {
            let sid = var("$sessionID");
            let sessions: Vec<Value> = state
                .find("ChatSession", "ChatSession.sessionID", &sid)
                .into_iter()
                .map(|uid| {
                    let linked = state.nodes[&uid]
                        .get("ChatSession.has_message")
                        .cloned()
                        .unwrap_or_else(|| json!([]));
                    json!({ "uid": uid, "messages": linked })
                })
                .collect();
            let messages: Vec<Value> = state
                .find("ChatMessage", "ChatMessage.sessionRef", &sid)
                .into_iter()
                .map(|uid| json!({ "uid": uid }))
                .collect();
            json!({ "sessions": sessions, "messages": messages })
        } else if query.query.contains("getProbeNode") {
            let link = var("$sessionLink");
            let nodes: Vec<Value> = state
                .find("ProbeNode", "ProbeNode.sessionLink", &link)
                .into_iter()
                .map(|uid| {
                    let mut node = state.nodes[&uid].clone();
                    node.insert("uid".to_string(), json!(uid));
                    Value::Object(node)
                })
                .collect();
            json!({ "probe": nodes })
        } else {
            json!({})
        }
    }

    fn apply_set(&self, upsert: Option<&str>, set: &Value) -> MutationResponse {
        let mut state = self.state.lock().unwrap();
        let mut bindings: BTreeMap<String, String> = BTreeMap::new();
        let mut uids = std::collections::HashMap::new();

        // An upsert block binds `session` to the existing session node.
        if upsert.is_some() {
            let roots: Vec<&Value> = match set {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            for root in roots {
                if let Some(sid) = root.get("ChatSession.sessionID").and_then(Value::as_str) {
                    let uid = match state.find("ChatSession", "ChatSession.sessionID", sid).first() {
                        Some(uid) => uid.clone(),
                        None => state.allocate(),
                    };
                    bindings.insert("uid(session)".to_string(), uid);
                }
            }
        }

        match set {
            Value::Array(items) => {
                for item in items {
                    apply_object(&mut state, &mut bindings, &mut uids, item);
                }
            }
            other => {
                apply_object(&mut state, &mut bindings, &mut uids, other);
            }
        }

        MutationResponse { uids }
    }
}

fn resolve_uid(
    state: &mut State,
    bindings: &mut BTreeMap<String, String>,
    uids: &mut std::collections::HashMap<String, String>,
    raw: Option<&str>,
) -> String {
    match raw {
        Some(r) if r.starts_with("_:") || r.starts_with("uid(") => {
            if let Some(uid) = bindings.get(r) {
                return uid.clone();
            }
            let uid = state.allocate();
            bindings.insert(r.to_string(), uid.clone());
            if let Some(label) = r.strip_prefix("_:") {
                uids.insert(label.to_string(), uid.clone());
            }
            uid
        }
        Some(r) => {
            state.nodes.entry(r.to_string()).or_default();
            r.to_string()
        }
        None => state.allocate(),
    }
}

fn apply_object(
    state: &mut State,
    bindings: &mut BTreeMap<String, String>,
    uids: &mut std::collections::HashMap<String, String>,
    object: &Value,
) -> String {
    let uid = resolve_uid(state, bindings, uids, object.get("uid").and_then(Value::as_str));
    let Some(fields) = object.as_object() else {
        return uid;
    };

    for (key, value) in fields {
        if key == "uid" {
            continue;
        }
        let stored = match value {
            Value::Object(_) => json!({ "uid": apply_object(state, bindings, uids, value) }),
            Value::Array(items) if items.iter().all(Value::is_object) => {
                let mut edges = Vec::new();
                for item in items {
                    edges.push(json!({ "uid": apply_object(state, bindings, uids, item) }));
                }
                let node = state.nodes.entry(uid.clone()).or_default();
                if let Some(Value::Array(existing)) = node.get_mut(key) {
                    existing.extend(edges);
                    continue;
                }
                Value::Array(edges)
            }
            scalar => scalar.clone(),
        };
        state
            .nodes
            .entry(uid.clone())
            .or_default()
            .insert(key.clone(), stored);
    }
    uid
}

impl GraphStore for FakeGraph {
    async fn query(&self, query: &GraphQuery) -> Result<Value, GraphError> {
        self.state.lock().unwrap().queries.push(query.clone());
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(GraphError::Transport("connection refused".to_string()));
        }
        if let Some(canned) = self.canned.lock().unwrap().clone() {
            return Ok(canned);
        }
        Ok(self.answer(query))
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<MutationResponse, GraphError> {
        self.state.lock().unwrap().mutations.push(mutation.clone());
        if self.fail_mutate.load(Ordering::SeqCst) {
            return Err(GraphError::Rejected("mutation aborted".to_string()));
        }
        match mutation {
            Mutation::SetJson { query, set } => Ok(self.apply_set(query.as_deref(), set)),
            Mutation::DeleteNquads(nquads) => {
                let mut state = self.state.lock().unwrap();
                for line in nquads.lines() {
                    let line = line.trim();
                    if let Some(rest) = line.strip_prefix('<')
                        && let Some((uid, _)) = rest.split_once('>')
                    {
                        state.nodes.remove(uid);
                    }
                }
                Ok(MutationResponse::default())
            }
        }
    }

    async fn alter_schema(&self, schema: &str) -> Result<(), GraphError> {
        if self.fail_alter.load(Ordering::SeqCst) {
            return Err(GraphError::Status {
                status: 500,
                body: "schema rejected".to_string(),
            });
        }
        self.state.lock().unwrap().schemas.push(schema.to_string());
        Ok(())
    }
}
