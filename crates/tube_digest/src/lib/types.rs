use serde::{Deserialize, Serialize};

/// Average reading speed used for `reading_time`
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthMode {
    #[default]
    Normal,
    ExtraShort,
}

/// Body of `POST /api/summarize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default = "enabled")]
    pub include_core: bool,
    #[serde(default = "enabled")]
    pub include_sections: bool,
    #[serde(default)]
    pub length_mode: LengthMode,
    #[serde(default)]
    pub model: Option<String>,
}

fn enabled() -> bool {
    true
}

impl SummarizeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            provider: None,
            include_core: true,
            include_sections: true,
            length_mode: LengthMode::Normal,
            model: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// The requested provider, treating an empty string as absent
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref().filter(|p| !p.is_empty())
    }

    pub fn options(&self) -> SummaryOptions {
        SummaryOptions {
            include_core: self.include_core,
            include_sections: self.include_sections,
            length_mode: self.length_mode,
            model: self.model.clone().filter(|m| !m.is_empty()),
        }
    }
}

/// Formatting knobs handed to a [`crate::Summarizer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub include_core: bool,
    pub include_sections: bool,
    pub length_mode: LengthMode,
    /// Overrides the provider's default model
    pub model: Option<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            include_core: true,
            include_sections: true,
            length_mode: LengthMode::Normal,
            model: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeResult {
    pub summary: String,
    #[serde(rename = "video_duration")]
    pub video_duration_seconds: f64,
    #[serde(rename = "reading_time")]
    pub reading_time_seconds: f64,
    pub word_count: usize,
}

impl SummarizeResult {
    pub fn new(summary: String, video_duration_seconds: f64) -> Self {
        let word_count = summary.split_whitespace().count();

        Self {
            summary,
            video_duration_seconds,
            reading_time_seconds: reading_time_seconds(word_count),
            word_count,
        }
    }
}

pub fn reading_time_seconds(word_count: usize) -> f64 {
    (word_count * 60) as f64 / WORDS_PER_MINUTE as f64
}

/// One line of the `application/x-ndjson` summarize stream.
///
/// Any number of `Status` events are followed by exactly one terminal
/// `Result` or `Error` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    Status { message: String },
    Result(SummarizeResult),
    Error { message: String },
}

impl StatusEvent {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Status { .. })
    }

    /// Serializes the event as a single newline-terminated JSON line
    pub fn to_ndjson(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
