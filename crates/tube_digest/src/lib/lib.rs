mod error;
pub mod http;
mod llm;
pub mod models;
pub mod prompt;
mod processor;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::{
    gemini, ollama,
    provider::{select_provider, LlmProvider, ProviderConfig, ProviderFactory, ProviderSelector},
    summarizer::Summarizer,
    ClientError,
};
pub use processor::{
    builder::SummaryPipelineBuilder, truncate_transcript, SummaryPipeline,
    DEFAULT_MAX_TRANSCRIPT_CHARS, TRUNCATION_MARKER,
};
