#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Could not find the innertube API key on the watch page of {0}")]
    MissingApiKey(String),
    #[error("Video {video_id} is unplayable: {reason}")]
    Unplayable { video_id: String, reason: String },
    #[error("Transcripts are disabled or unavailable for video {0}")]
    NoCaptions(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
