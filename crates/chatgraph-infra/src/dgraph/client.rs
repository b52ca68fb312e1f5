//! DgraphClient -- [`GraphStore`] over Dgraph's HTTP API.
//!
//! - `POST /query` with a JSON body `{query, variables}`
//! - `POST /mutate?commitNow=true` with a JSON set/upsert body or an RDF
//!   `{ delete { ... } }` body
//! - `POST /alter` with the raw schema text
//!
//! Dgraph reports most failures as HTTP 200 with an `errors` array, so every
//! response body is inspected, not just the status code.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use chatgraph_core::graph::store::GraphStore;
use chatgraph_types::config::GraphConfig;
use chatgraph_types::graph::{GraphError, GraphQuery, Mutation, MutationResponse};

/// HTTP client for a single Dgraph endpoint.
///
/// The access token, when configured, is held as a [`SecretString`] and only
/// exposed while building request headers.
pub struct DgraphClient {
    client: reqwest::Client,
    endpoint: String,
    connection_name: String,
    auth: Option<(String, SecretString)>,
}

impl DgraphClient {
    /// Create a client for `config`, authenticating with `token` if given.
    pub fn new(config: &GraphConfig, token: Option<SecretString>) -> Result<Self, GraphError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GraphError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            connection_name: config.connection_name.clone(),
            auth: token.map(|t| (config.auth_header.clone(), t)),
        })
    }

    /// Create a client, reading the access token from `config.auth_token_env`.
    pub fn from_config(config: &GraphConfig) -> Result<Self, GraphError> {
        let token = config
            .auth_token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        Self::new(config, token)
    }

    pub fn connection_name(&self) -> &str {
        &self.connection_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.post(format!("{}{}", self.endpoint, path));
        match &self.auth {
            Some((header, token)) => builder.header(header.as_str(), token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, GraphError> {
        let response = request
            .send()
            .await
            .map_err(|e| GraphError::Transport(format!("{} ({}): {e}", self.connection_name, self.endpoint)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GraphError::Transport(format!("failed to read response body: {e}")))?;

        decode_response(status, &body)
    }
}

/// Wrap N-Quad deletion statements in an RDF mutation body.
pub fn rdf_delete_body(nquads: &str) -> String {
    format!("{{\n  delete {{\n{nquads}\n  }}\n}}")
}

/// Turn a raw Dgraph HTTP response into its `data` object.
///
/// Non-2xx statuses and non-empty `errors` arrays become errors. A response
/// without `data` yields `Value::Null`.
pub fn decode_response(status: u16, body: &str) -> Result<Value, GraphError> {
    let parsed: Result<Value, _> = serde_json::from_str(body);

    if !(200..300).contains(&status) {
        let detail = parsed
            .as_ref()
            .ok()
            .and_then(error_messages)
            .unwrap_or_else(|| body.to_string());
        return Err(GraphError::Status {
            status,
            body: detail,
        });
    }

    let mut value = parsed
        .map_err(|e| GraphError::Deserialization(format!("invalid JSON from graph store: {e}")))?;

    if let Some(messages) = error_messages(&value) {
        return Err(GraphError::Rejected(messages));
    }

    Ok(value.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}

fn error_messages(value: &Value) -> Option<String> {
    let errors = value.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let joined = errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string())
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(joined)
}

impl GraphStore for DgraphClient {
    async fn query(&self, query: &GraphQuery) -> Result<Value, GraphError> {
        debug!(connection = %self.connection_name, vars = query.variables.len(), "Dgraph query");
        self.send(self.post("/query").json(query)).await
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<MutationResponse, GraphError> {
        let request = match mutation {
            Mutation::SetJson { query, set } => {
                let body = match query {
                    Some(q) => json!({ "query": q, "set": set }),
                    None => json!({ "set": set }),
                };
                self.post("/mutate?commitNow=true").json(&body)
            }
            Mutation::DeleteNquads(nquads) => self
                .post("/mutate?commitNow=true")
                .header(CONTENT_TYPE, "application/rdf")
                .body(rdf_delete_body(nquads)),
        };

        debug!(connection = %self.connection_name, "Dgraph mutation");
        let data = self.send(request).await?;
        if data.is_null() {
            return Ok(MutationResponse::default());
        }
        serde_json::from_value(data)
            .map_err(|e| GraphError::Deserialization(format!("invalid mutation response: {e}")))
    }

    async fn alter_schema(&self, schema: &str) -> Result<(), GraphError> {
        debug!(connection = %self.connection_name, "Dgraph schema alteration");
        self.send(self.post("/alter").body(schema.to_string())).await?;
        Ok(())
    }
}
