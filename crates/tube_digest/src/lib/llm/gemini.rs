use reqwest::Client;
use serde::Deserialize;

use crate::{llm::ClientError, prompt::prompt_for, types::SummaryOptions, Summarizer};

/// Client for the Gemini `generativelanguage` REST API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, or the reason there is none
    pub fn into_text(self) -> Result<String, ClientError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => ClientError::Blocked(reason),
                None => ClientError::NoContent("No candidates returned from Gemini".into()),
            });
        };

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }

        Err(match candidate.finish_reason {
            Some(reason) => {
                ClientError::NoContent(format!("Generation returned no text. Finish reason: {reason}"))
            }
            None => ClientError::NoContent("No response content from Gemini".into()),
        })
    }
}

impl GeminiClient {
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    const SAFETY_CATEGORIES: [&str; 4] = [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ];

    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Gemini reports failures as `{"error": {"message": ...}}`; fall back to
    /// the raw body when it does not.
    async fn api_error(resp: reqwest::Response) -> ClientError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);

        ClientError::Api { status, message }
    }

    #[tracing::instrument(skip(self, prompt))]
    pub async fn send_generate_content_request(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, ClientError> {
        let safety_settings = Self::SAFETY_CATEGORIES
            .iter()
            .map(|category| {
                serde_json::json!({ "category": category, "threshold": "BLOCK_ONLY_HIGH" })
            })
            .collect::<Vec<_>>();

        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [{ "text": prompt }]
                }
            ],
            "safetySettings": safety_settings
        });

        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(Self::api_error(resp).await);
        }

        Ok(resp.json::<GenerateContentResponse>().await?)
    }

    /// Names of the models that support `generateContent`, without the
    /// `models/` prefix
    #[tracing::instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<String>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/models", self.base_url))
            .query(&[("pageSize", "1000")])
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(Self::api_error(resp).await);
        }

        let models = resp
            .json::<ListModelsResponse>()
            .await?
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| {
                m.name
                    .strip_prefix("models/")
                    .map(str::to_string)
                    .unwrap_or(m.name)
            })
            .collect();

        Ok(models)
    }
}

impl Summarizer for GeminiClient {
    type Error = ClientError;

    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn summarize(
        &self,
        transcript: &str,
        options: &SummaryOptions,
    ) -> Result<String, Self::Error> {
        let model = options.model.as_deref().unwrap_or(Self::DEFAULT_MODEL);
        let prompt = prompt_for(transcript, options);

        self.send_generate_content_request(model, &prompt)
            .await
            .and_then(GenerateContentResponse::into_text)
            .inspect_err(|e| tracing::error!(error = %e, model, "Failed to summarize content"))
    }
}
