#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid YouTube URL")]
    InvalidUrl,
    #[error("Failed to fetch transcript: {0}")]
    TranscriptFetchFailed(String),
    #[error("{0}")]
    Configuration(String),
    #[error("Unknown LLM provider{}: {name}", origin(.from_env))]
    UnknownProvider { name: String, from_env: bool },
    #[error("Failed to communicate with {provider}: {message}")]
    ProviderCommunication {
        provider: &'static str,
        message: String,
    },
}

fn origin(from_env: &bool) -> &'static str {
    if *from_env {
        " specified in LLM_PROVIDER environment variable"
    } else {
        ""
    }
}
