use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{llm::ClientError, prompt::prompt_for, types::SummaryOptions, Summarizer};

/// Client for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: Option<String>,
}

impl OllamaClient {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
    pub const DEFAULT_MODEL: &str = "gemma3:12b-it-qat";
    const NO_RESPONSE: &str = "No response from Ollama";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[tracing::instrument(skip(self, prompt))]
    pub async fn send_generate_request(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateResponse, ClientError> {
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let resp = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, message });
        }

        Ok(resp.json::<GenerateResponse>().await?)
    }
}

impl Summarizer for OllamaClient {
    type Error = ClientError;

    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn summarize(
        &self,
        transcript: &str,
        options: &SummaryOptions,
    ) -> Result<String, Self::Error> {
        let model = options.model.as_deref().unwrap_or(Self::DEFAULT_MODEL);
        let prompt = prompt_for(transcript, options);

        let response = self
            .send_generate_request(model, &prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, model, "Failed to summarize content"))?;

        Ok(response
            .response
            .unwrap_or_else(|| Self::NO_RESPONSE.to_string()))
    }
}
