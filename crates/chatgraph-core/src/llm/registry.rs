//! Model registry for runtime model lookup.
//!
//! A simple name-indexed registry of boxed LLM providers. The chat handler
//! resolves its configured model name here on every turn.

use std::collections::HashMap;

use super::box_provider::BoxLlmProvider;

/// Registry of available models, indexed by configured name.
pub struct ModelRegistry {
    models: HashMap<String, BoxLlmProvider>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Register a model under the given name.
    ///
    /// If a model with this name already exists, it is replaced.
    pub fn register(&mut self, name: impl Into<String>, provider: BoxLlmProvider) {
        self.models.insert(name.into(), provider);
    }

    /// Look up a model by name.
    pub fn get(&self, name: &str) -> Option<&BoxLlmProvider> {
        self.models.get(name)
    }

    /// List all registered model names, sorted.
    pub fn list_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
