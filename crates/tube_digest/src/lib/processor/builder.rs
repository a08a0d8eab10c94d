use yt_transcript::TranscriptApi;

use crate::{processor::DEFAULT_MAX_TRANSCRIPT_CHARS, ProviderSelector, SummaryPipeline};

pub struct SummaryPipelineBuilder<T = (), P = ()> {
    transcripts: T,
    providers: P,
    max_transcript_chars: usize,
}

impl SummaryPipelineBuilder {
    pub fn new() -> Self {
        Self {
            transcripts: (),
            providers: (),
            max_transcript_chars: DEFAULT_MAX_TRANSCRIPT_CHARS,
        }
    }
}

impl Default for SummaryPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> SummaryPipelineBuilder<T, P> {
    pub fn transcripts<T2: TranscriptApi + Send + Sync + 'static>(
        self,
        transcripts: T2,
    ) -> SummaryPipelineBuilder<T2, P> {
        SummaryPipelineBuilder {
            transcripts,
            providers: self.providers,
            max_transcript_chars: self.max_transcript_chars,
        }
    }

    pub fn providers<P2: ProviderSelector + Send + Sync + 'static>(
        self,
        providers: P2,
    ) -> SummaryPipelineBuilder<T, P2> {
        SummaryPipelineBuilder {
            transcripts: self.transcripts,
            providers,
            max_transcript_chars: self.max_transcript_chars,
        }
    }

    /// Transcripts longer than this many characters are truncated
    pub fn max_transcript_chars(mut self, max_transcript_chars: usize) -> Self {
        self.max_transcript_chars = max_transcript_chars;
        self
    }
}

impl<T, P> SummaryPipelineBuilder<T, P>
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    pub fn build(self) -> SummaryPipeline<T, P> {
        SummaryPipeline {
            transcripts: self.transcripts,
            providers: self.providers,
            max_transcript_chars: self.max_transcript_chars,
        }
    }
}
