use reqwest::Client;

use crate::{
    gemini::GeminiClient, llm::ClientError, ollama::OllamaClient, types::SummaryOptions, Error,
    Summarizer,
};

pub const OLLAMA: &str = "ollama";
pub const GEMINI: &str = "gemini";

/// Provider settings, resolved once at startup from the CLI / environment
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Used when a request names no provider; falls back to [`GEMINI`]
    pub default_provider: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ollama_url: String,
    pub gemini_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            gemini_api_key: None,
            ollama_url: OllamaClient::DEFAULT_BASE_URL.into(),
            gemini_url: GeminiClient::DEFAULT_BASE_URL.into(),
        }
    }
}

impl ProviderConfig {
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone)]
pub enum LlmProvider {
    Ollama(OllamaClient),
    Gemini(GeminiClient),
}

impl Summarizer for LlmProvider {
    type Error = ClientError;

    fn name(&self) -> &'static str {
        match self {
            LlmProvider::Ollama(client) => client.name(),
            LlmProvider::Gemini(client) => client.name(),
        }
    }

    async fn summarize(
        &self,
        transcript: &str,
        options: &SummaryOptions,
    ) -> Result<String, Self::Error> {
        match self {
            LlmProvider::Ollama(client) => client.summarize(transcript, options).await,
            LlmProvider::Gemini(client) => client.summarize(transcript, options).await,
        }
    }
}

/// Resolves the backend for a request.
///
/// An explicit `name` wins; otherwise `config.default_provider` is used, and
/// Gemini when that is unset too. Names are case-insensitive. No network
/// calls are made here.
pub fn select_provider(
    name: Option<&str>,
    config: &ProviderConfig,
    client: &Client,
) -> Result<LlmProvider, Error> {
    let (name, from_env) = match name.filter(|n| !n.is_empty()) {
        Some(name) => (name.to_lowercase(), false),
        None => (
            config
                .default_provider
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or(GEMINI)
                .to_lowercase(),
            true,
        ),
    };

    match name.as_str() {
        OLLAMA => Ok(LlmProvider::Ollama(
            OllamaClient::new(client.clone()).with_base_url(&config.ollama_url),
        )),
        GEMINI => {
            let api_key = config.gemini_api_key().ok_or_else(|| {
                Error::Configuration("GEMINI_API_KEY environment variable is not set".into())
            })?;

            Ok(LlmProvider::Gemini(
                GeminiClient::new(client.clone(), api_key).with_base_url(&config.gemini_url),
            ))
        }
        _ => Err(Error::UnknownProvider { name, from_env }),
    }
}

/// Seam between the summary pipeline and backend construction
pub trait ProviderSelector {
    type Provider: Summarizer + Send + Sync;

    fn select(&self, name: Option<&str>) -> Result<Self::Provider, Error>;
}

/// Builds HTTP backed providers from a [`ProviderConfig`]
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    client: Client,
    config: ProviderConfig,
}

impl ProviderFactory {
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

impl ProviderSelector for ProviderFactory {
    type Provider = LlmProvider;

    fn select(&self, name: Option<&str>) -> Result<Self::Provider, Error> {
        select_provider(name, &self.config, &self.client)
            .inspect_err(|e| tracing::warn!(error = %e, requested = ?name, "Provider selection failed"))
    }
}
