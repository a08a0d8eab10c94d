//! # Models
//!
//! Advisory model listings for the UI. Nothing here is allowed to fail a
//! request: every error is logged and turned into an empty list.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use tokio::process::Command;

use crate::{gemini::GeminiClient, ProviderConfig};

pub const DEFAULT_OLLAMA_MODELS_FILE: &str = "ollama_models.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    Ollama,
}

impl FromStr for ModelProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(ModelProvider::Gemini),
            "ollama" => Ok(ModelProvider::Ollama),
            other => Err(format!("Invalid provider: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    client: reqwest::Client,
    gemini_api_key: Option<String>,
    gemini_url: String,
    ollama_models_file: PathBuf,
}

impl ModelCatalog {
    pub fn new(
        client: reqwest::Client,
        config: &ProviderConfig,
        ollama_models_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            gemini_api_key: config.gemini_api_key().map(str::to_string),
            gemini_url: config.gemini_url.clone(),
            ollama_models_file: ollama_models_file.into(),
        }
    }

    /// Lists the models of `provider`, empty on any failure
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, provider: ModelProvider) -> Vec<String> {
        let result = match provider {
            ModelProvider::Gemini => self.gemini_models().await,
            ModelProvider::Ollama => load_ollama_models(&self.ollama_models_file).await,
        };

        result
            .inspect_err(|e| tracing::warn!(error = ?e, "Failed to list models"))
            .unwrap_or_default()
    }

    async fn gemini_models(&self) -> anyhow::Result<Vec<String>> {
        let api_key = self
            .gemini_api_key
            .as_deref()
            .context("GEMINI_API_KEY environment variable is not set")?;

        let models = GeminiClient::new(self.client.clone(), api_key)
            .with_base_url(&self.gemini_url)
            .list_models()
            .await?;

        Ok(models)
    }
}

/// Reads the model list written by [`refresh_ollama_models`]
pub async fn load_ollama_models(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parses `ollama list` output: a header row followed by one model per row,
/// name in the first column.
pub fn parse_ollama_list(stdout: &str) -> Vec<String> {
    let mut lines = stdout.trim().lines().peekable();

    if lines
        .peek()
        .is_some_and(|header| header.contains("NAME") && header.contains("ID"))
    {
        lines.next();
    }

    lines
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

async fn list_installed_ollama_models() -> anyhow::Result<Vec<String>> {
    let output = Command::new("ollama")
        .arg("list")
        .output()
        .await
        .context("Failed to run 'ollama list'")?;

    if !output.status.success() {
        anyhow::bail!(
            "'ollama list' failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(parse_ollama_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Snapshots the locally installed Ollama models into `path`.
///
/// The file is always written; an empty list is stored when `ollama` is
/// missing or fails.
pub async fn refresh_ollama_models(path: &Path) -> anyhow::Result<Vec<String>> {
    let models = list_installed_ollama_models()
        .await
        .inspect_err(|e| tracing::warn!(error = ?e, "Could not list Ollama models"))
        .unwrap_or_default();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tokio::fs::write(path, serde_json::to_vec(&models)?)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_ollama_list_output() {
        let stdout = "NAME                   ID              SIZE      MODIFIED\n\
                      gemma3:12b-it-qat      5d4fa005e7bb    8.9 GB    2 days ago\n\
                      llama3.2:latest        a80c4f17acd5    2.0 GB    3 weeks ago\n\
                      \n";

        assert_eq!(
            parse_ollama_list(stdout),
            vec!["gemma3:12b-it-qat", "llama3.2:latest"]
        );
    }

    #[test]
    fn test_parses_output_without_header() {
        assert_eq!(parse_ollama_list("mistral:7b  abc  4 GB  now"), vec!["mistral:7b"]);
        assert!(parse_ollama_list("").is_empty());
        assert!(parse_ollama_list("NAME ID SIZE MODIFIED\n").is_empty());
    }

    #[test]
    fn test_model_provider_from_path() {
        assert_eq!("gemini".parse(), Ok(ModelProvider::Gemini));
        assert_eq!("ollama".parse(), Ok(ModelProvider::Ollama));
        assert!("openai".parse::<ModelProvider>().is_err());
    }

    #[tokio::test]
    async fn test_missing_model_file_is_an_error() {
        let path = Path::new("/definitely/not/here/ollama_models.json");
        assert!(load_ollama_models(path).await.is_err());
    }

    #[tokio::test]
    async fn test_catalog_swallows_failures() {
        let catalog = ModelCatalog::new(
            reqwest::Client::new(),
            &ProviderConfig::default(),
            "/definitely/not/here/ollama_models.json",
        );

        assert!(catalog.list(ModelProvider::Ollama).await.is_empty());
        // no api key configured
        assert!(catalog.list(ModelProvider::Gemini).await.is_empty());
    }
}
