use std::sync::{Arc, Mutex};
use tube_digest::{types::SummaryOptions, Error, ProviderSelector, Summarizer};

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<(String, SummaryOptions)>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            summary: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Summarizer for MockSummarizer {
    type Error = anyhow::Error;

    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn summarize(
        &self,
        transcript: &str,
        options: &SummaryOptions,
    ) -> Result<String, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((transcript.to_string(), options.clone()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.summary.clone())
    }
}

/// Accepts "ollama" and "gemini", handing out the same mock for both
#[derive(Clone)]
pub struct MockProviders {
    pub summarizer: MockSummarizer,
    pub selections: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockProviders {
    pub fn new(summarizer: MockSummarizer) -> Self {
        Self {
            summarizer,
            selections: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ProviderSelector for MockProviders {
    type Provider = MockSummarizer;

    fn select(&self, name: Option<&str>) -> Result<Self::Provider, Error> {
        self.selections
            .lock()
            .unwrap()
            .push(name.map(str::to_string));

        match name.unwrap_or("gemini") {
            "ollama" | "gemini" => Ok(self.summarizer.clone()),
            other => Err(Error::UnknownProvider {
                name: other.to_string(),
                from_env: false,
            }),
        }
    }
}
