//! Global configuration types for chatgraph.
//!
//! `GlobalConfig` represents the top-level `config.toml`: which model the chat
//! handler uses, how to reach the graph store, and the catalogue of models
//! that can be resolved by name. All fields have defaults.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    /// Models that can be resolved by name. Defaults to a single Gemini entry.
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            chat: ChatConfig::default(),
            graph: GraphConfig::default(),
            models: default_models(),
        }
    }
}

/// Settings for the conversation orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Name of the entry in `models` used for every chat turn.
    #[serde(default = "default_model_name")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// System instruction seeded into sessions that have no history.
    #[serde(default = "default_system_prompt")]
    pub default_system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model_name(),
            temperature: default_temperature(),
            max_tokens: None,
            default_system_prompt: default_system_prompt(),
        }
    }
}

/// How to reach the graph store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Logical connection name, used in logs.
    #[serde(default = "default_connection_name")]
    pub connection_name: String,

    /// Base URL of the Dgraph HTTP endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding an access token, if the store requires one.
    #[serde(default)]
    pub auth_token_env: Option<String>,

    /// Header the access token is sent in.
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            connection_name: default_connection_name(),
            endpoint: default_endpoint(),
            auth_token_env: None,
            auth_header: default_auth_header(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A named model reachable through an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Name used to resolve this model (e.g. "google-gemini").
    pub name: String,
    /// Provider family: "openai", "gemini", "mistral", or any name with `base_url` set.
    pub provider: String,
    /// Provider-side model id (e.g. "gemini-2.0-flash").
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Override for the provider's base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_model_name() -> String {
    "google-gemini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_system_prompt() -> String {
    "You are a helpful assistant".to_string()
}

fn default_connection_name() -> String {
    "website".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_auth_header() -> String {
    "X-Auth-Token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_models() -> Vec<ModelConfig> {
    vec![ModelConfig {
        name: default_model_name(),
        provider: "gemini".to_string(),
        model: "gemini-2.0-flash".to_string(),
        api_key_env: "GEMINI_API_KEY".to_string(),
        base_url: None,
    }]
}
