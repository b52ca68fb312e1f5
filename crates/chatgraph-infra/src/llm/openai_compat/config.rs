//! Per-provider defaults for OpenAI-compatible endpoints.
//!
//! Each factory returns an [`OpenAiCompatConfig`] with the provider's base URL.
//! A configured `base_url` overrides it (see [`OpenAiCompatConfig::with_base_url`]).

use secrecy::SecretString;

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Provider name used in logs and spans (e.g., "openai", "gemini").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model id (e.g., "gemini-2.0-flash").
    pub model: String,
}

impl OpenAiCompatConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

fn defaults(provider: &str, base_url: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: provider.into(),
        base_url: base_url.into(),
        api_key,
        model: model.into(),
    }
}

/// OpenAI. Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    defaults("openai", OPENAI_BASE_URL, api_key, model)
}

/// Google Gemini through its OpenAI-compatible beta endpoint.
///
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    defaults("gemini", GEMINI_BASE_URL, api_key, model)
}

/// Mistral AI. Base URL: `https://api.mistral.ai/v1`
pub fn mistral_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    defaults("mistral", MISTRAL_BASE_URL, api_key, model)
}

/// Defaults for a well-known provider name.
///
/// Hands the key back when the name is unknown so the caller can build a
/// custom configuration with it.
pub fn known_defaults(
    provider: &str,
    api_key: SecretString,
    model: &str,
) -> Result<OpenAiCompatConfig, SecretString> {
    match provider {
        "openai" => Ok(openai_defaults(api_key, model)),
        "gemini" => Ok(gemini_defaults(api_key, model)),
        "mistral" => Ok(mistral_defaults(api_key, model)),
        _ => Err(api_key),
    }
}
