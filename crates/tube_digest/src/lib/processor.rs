use std::{future::Future, sync::Arc};

use futures::Stream;
use tokio::sync::mpsc;
use yt_transcript::TranscriptApi;

use crate::{
    types::{StatusEvent, SummarizeRequest, SummarizeResult},
    yt::fetch_transcript,
    Error, ProviderSelector, Summarizer,
};

pub mod builder;

pub const DEFAULT_MAX_TRANSCRIPT_CHARS: usize = 100_000;
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// Cuts `text` to `max_chars` characters and appends [`TRUNCATION_MARKER`].
///
/// Returns `None` when the text already fits.
pub fn truncate_transcript(text: &str, max_chars: usize) -> Option<String> {
    text.char_indices()
        .nth(max_chars)
        .map(|(idx, _)| format!("{}{TRUNCATION_MARKER}", &text[..idx]))
}

/// Why a pipeline run stopped before producing a result
enum Halt {
    Failed(Error),
    Disconnected,
}

impl From<Error> for Halt {
    fn from(e: Error) -> Self {
        Halt::Failed(e)
    }
}

/// Sending half of a request's event stream
struct EventSink(mpsc::Sender<StatusEvent>);

impl EventSink {
    async fn emit(&self, event: StatusEvent) -> Result<(), Halt> {
        self.0.send(event).await.map_err(|_| Halt::Disconnected)
    }

    async fn status(&self, message: impl Into<String>) -> Result<(), Halt> {
        self.emit(StatusEvent::status(message)).await
    }

    /// Drives `fut` unless the consumer hangs up first
    async fn until_closed<F: Future>(&self, fut: F) -> Result<F::Output, Halt> {
        tokio::select! {
            output = fut => Ok(output),
            _ = self.0.closed() => Err(Halt::Disconnected),
        }
    }
}

/// Turns a [`SummarizeRequest`] into a stream of [`StatusEvent`]s:
/// transcript download, optional truncation, provider call, result.
#[derive(Debug)]
pub struct SummaryPipeline<T, P>
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    transcripts: T,
    providers: P,
    max_transcript_chars: usize,
}

impl<T, P> SummaryPipeline<T, P>
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    const EVENT_BUFFER: usize = 8;

    pub fn new(transcripts: T, providers: P) -> Self {
        SummaryPipeline {
            transcripts,
            providers,
            max_transcript_chars: DEFAULT_MAX_TRANSCRIPT_CHARS,
        }
    }

    /// Runs the pipeline on its own task.
    ///
    /// Dropping the returned stream abandons whatever step is in flight.
    pub fn stream(
        self: Arc<Self>,
        request: SummarizeRequest,
    ) -> impl Stream<Item = StatusEvent> + Send + 'static {
        let (tx, rx) = mpsc::channel(Self::EVENT_BUFFER);
        tokio::spawn(async move { self.run(request, tx).await });

        futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })
    }

    /// Sends the events of `request` into `events`, finishing with exactly one
    /// `Result` or `Error` unless the receiver is dropped first.
    #[tracing::instrument(
        skip_all,
        fields(url = %request.url, provider = ?request.provider(), video_id = tracing::field::Empty)
    )]
    pub async fn run(&self, request: SummarizeRequest, events: mpsc::Sender<StatusEvent>) {
        let sink = EventSink(events);

        let terminal = match self.summarize(&request, &sink).await {
            Ok(result) => {
                tracing::info!(word_count = result.word_count, "Summary generated");
                StatusEvent::Result(result)
            }
            Err(Halt::Failed(e)) => {
                tracing::error!(error = %e, "Failed to summarize video");
                StatusEvent::error(e.to_string())
            }
            Err(Halt::Disconnected) => {
                tracing::info!("Client disconnected, abandoning request");
                return;
            }
        };

        if sink.emit(terminal).await.is_err() {
            tracing::info!("Client disconnected before the final event");
        }
    }

    async fn summarize(
        &self,
        request: &SummarizeRequest,
        sink: &EventSink,
    ) -> Result<SummarizeResult, Halt> {
        sink.status("Fetching transcript...").await?;
        let transcript = sink
            .until_closed(fetch_transcript(&self.transcripts, &request.url))
            .await??;
        tracing::Span::current().record("video_id", transcript.video_id.as_str());

        let mut text = transcript.text;
        if let Some(truncated) = truncate_transcript(&text, self.max_transcript_chars) {
            sink.status("Truncating transcript...").await?;
            tracing::warn!(
                max_chars = self.max_transcript_chars,
                "Transcript too long, truncating"
            );
            text = truncated;
        }

        let label = request.provider().unwrap_or("default");
        sink.status(format!("Generating summary with {label}..."))
            .await?;

        let provider = self.providers.select(request.provider())?;
        let summary = sink
            .until_closed(provider.summarize(&text, &request.options()))
            .await?
            .map_err(|e| Error::ProviderCommunication {
                provider: provider.name(),
                message: e.to_string(),
            })?;

        Ok(SummarizeResult::new(summary, transcript.duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_transcript_is_untouched() {
        assert_eq!(truncate_transcript("hello world", 100), None);
        assert_eq!(truncate_transcript("", 0), None);
    }

    #[test]
    fn test_transcript_at_limit_is_untouched() {
        let text = "a".repeat(DEFAULT_MAX_TRANSCRIPT_CHARS);
        assert_eq!(truncate_transcript(&text, DEFAULT_MAX_TRANSCRIPT_CHARS), None);
    }

    #[test]
    fn test_long_transcript_is_cut_to_limit() {
        let text = "a".repeat(DEFAULT_MAX_TRANSCRIPT_CHARS + 1);
        let truncated = truncate_transcript(&text, DEFAULT_MAX_TRANSCRIPT_CHARS).unwrap();

        assert_eq!(
            truncated.len(),
            DEFAULT_MAX_TRANSCRIPT_CHARS + TRUNCATION_MARKER.len()
        );
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(truncated.starts_with(&text[..DEFAULT_MAX_TRANSCRIPT_CHARS]));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "żółw ".repeat(10);
        let truncated = truncate_transcript(&text, 7).unwrap();

        assert_eq!(truncated, format!("żółw żó{TRUNCATION_MARKER}"));
    }
}
