//! LLM provider implementations.
//!
//! [`create_provider`] builds a [`BoxLlmProvider`] from a [`ModelConfig`];
//! [`build_model_registry`] does so for every configured model whose API key
//! is present in the environment.

pub mod openai_compat;

use secrecy::SecretString;
use tracing::{info, warn};

use chatgraph_core::llm::box_provider::BoxLlmProvider;
use chatgraph_core::llm::registry::ModelRegistry;
use chatgraph_types::config::ModelConfig;
use chatgraph_types::error::ConfigError;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{OpenAiCompatConfig, known_defaults};

/// Create a provider for `config` authenticated with `api_key`.
///
/// Well-known provider names get their default base URL; any other name
/// requires `base_url`.
pub fn create_provider(
    config: &ModelConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, ConfigError> {
    let oai_config = match known_defaults(&config.provider, api_key, &config.model) {
        Ok(defaults) => match config.base_url.as_deref() {
            Some(base_url) => defaults.with_base_url(base_url),
            None => defaults,
        },
        Err(api_key) => match config.base_url.as_deref() {
            Some(base_url) => OpenAiCompatConfig {
                provider_name: config.provider.clone(),
                base_url: base_url.to_string(),
                api_key,
                model: config.model.clone(),
            },
            None => {
                return Err(ConfigError::UnknownProvider {
                    model: config.name.clone(),
                    provider: config.provider.clone(),
                });
            }
        },
    };

    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
}

/// Resolve the API key for `config` from its environment variable.
pub fn api_key_from_env(config: &ModelConfig) -> Result<SecretString, ConfigError> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|k| !k.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingApiKey {
            model: config.name.clone(),
            env: config.api_key_env.clone(),
        })
}

/// Build a registry from `models`, resolving keys with `lookup_key`.
///
/// Models that cannot be constructed are skipped with a warning, so a chat
/// turn that needs them fails with "model unavailable".
pub fn build_registry_with<F>(models: &[ModelConfig], lookup_key: F) -> ModelRegistry
where
    F: Fn(&ModelConfig) -> Result<SecretString, ConfigError>,
{
    let mut registry = ModelRegistry::new();
    for model in models {
        match lookup_key(model).and_then(|key| create_provider(model, key)) {
            Ok(provider) => {
                info!(model = %model.name, provider = %provider.name(), "Registered model");
                registry.register(model.name.clone(), provider);
            }
            Err(e) => warn!(model = %model.name, error = %e, "Skipping model"),
        }
    }
    registry
}

/// Build a registry from `models`, reading API keys from the environment.
pub fn build_model_registry(models: &[ModelConfig]) -> ModelRegistry {
    build_registry_with(models, api_key_from_env)
}
