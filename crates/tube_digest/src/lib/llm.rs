pub mod gemini;
pub mod ollama;
pub mod provider;
pub mod summarizer;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Request blocked: {0}")]
    Blocked(String),
    #[error("{0}")]
    NoContent(String),
}
