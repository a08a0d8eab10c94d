use std::{fmt::Display, future::Future};

use crate::types::SummaryOptions;

pub trait Summarizer {
    type Error: Display;

    /// Human readable backend name, e.g. `"Ollama"`
    fn name(&self) -> &'static str;

    fn summarize(
        &self,
        transcript: &str,
        options: &SummaryOptions,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
