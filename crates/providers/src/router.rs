//! Provider router: builds the configured provider from `AppConfig`.
//!
//! A failure here is a configuration error: the run stops before any
//! timetable is generated.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use learnveda_config::AppConfig;
use learnveda_core::error::{Error, ProviderError};
use learnveda_core::provider::Provider;

use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Routes advisory requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// Name of the default provider.
    pub fn default_name(&self) -> &str {
        &self.default_provider
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build the router from configuration.
///
/// Every `[providers.<name>]` entry is built, plus the default provider even
/// when it has no entry of its own. Any provider that cannot be built (for
/// example a missing API key) is a configuration error.
pub fn build_from_config(config: &AppConfig) -> Result<ProviderRouter, Error> {
    let mut router = ProviderRouter::new(&config.default_provider);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let mut names: Vec<&String> = config.providers.keys().collect();
    if !config.providers.contains_key(&config.default_provider) {
        names.push(&config.default_provider);
    }

    for name in names {
        let provider = build_named(config, name, timeout)?;
        router.register(name.clone(), provider);
    }

    Ok(router)
}

/// Build only the default provider.
///
/// Other `[providers.<name>]` entries are left alone, so an incomplete
/// secondary entry does not block a run that never uses it.
pub fn build_default_provider(config: &AppConfig) -> Result<Arc<dyn Provider>, Error> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    build_named(config, &config.default_provider, timeout)
}

fn build_named(config: &AppConfig, name: &str, timeout: Duration) -> Result<Arc<dyn Provider>, Error> {
    let provider = build_provider(config, name, timeout)
        .map_err(|e| Error::config(format!("cannot initialize provider '{name}': {e}")))?;
    tracing::debug!(provider = %name, "Provider initialized");
    Ok(provider)
}

fn build_provider(
    config: &AppConfig,
    name: &str,
    timeout: Duration,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let entry = config.providers.get(name);
    let api_url = entry.and_then(|p| p.api_url.clone());
    let api_key = config.api_key_for(name);

    match name {
        "gemini" | "google" => {
            let key = api_key.ok_or_else(|| missing_key(name))?;
            let mut provider = GeminiProvider::new(key)?.with_timeout(timeout)?;
            if let Some(url) = api_url {
                provider = provider.with_base_url(url);
            }
            Ok(Arc::new(provider))
        }
        _ => {
            let key = match api_key {
                Some(key) => key,
                None if is_local(name) => String::new(),
                None => return Err(missing_key(name)),
            };
            let base_url = api_url.unwrap_or_else(|| default_base_url(name));
            let provider = OpenAiCompatProvider::new(name, base_url, key)?.with_timeout(timeout)?;
            Ok(Arc::new(provider))
        }
    }
}

fn missing_key(name: &str) -> ProviderError {
    ProviderError::NotConfigured(format!(
        "no API key for '{name}'; set api_key in the config file or LEARNVEDA_API_KEY"
    ))
}

/// Local runtimes that accept requests without a key.
fn is_local(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
