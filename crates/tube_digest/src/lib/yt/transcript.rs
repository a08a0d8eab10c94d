use itertools::Itertools;
use yt_transcript::{TranscriptApi, TranscriptSegment};

use crate::{yt::extract_video_id, Error};

/// Plain-text transcript of a video
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub video_id: String,
    pub text: String,
    /// End of the last caption, in seconds
    pub duration: f64,
}

impl Transcript {
    pub fn from_segments(video_id: impl Into<String>, segments: &[TranscriptSegment]) -> Self {
        let text = segments.iter().map(|s| s.text.as_str()).join(" ");
        let duration = segments.last().map(TranscriptSegment::end).unwrap_or(0.0);

        Self {
            video_id: video_id.into(),
            text,
            duration,
        }
    }
}

/// Resolves the video id of `url` and downloads its captions via `api`
#[tracing::instrument(skip(api))]
pub async fn fetch_transcript<T: TranscriptApi>(api: &T, url: &str) -> Result<Transcript, Error> {
    let video_id = extract_video_id(url).ok_or(Error::InvalidUrl)?;

    let segments = api
        .fetch_segments(video_id)
        .await
        .inspect_err(|e| tracing::error!(error = %e, video_id, "Failed to fetch transcript"))
        .map_err(|e| Error::TranscriptFetchFailed(e.to_string()))?;

    tracing::info!(video_id, segments = segments.len(), "Fetched transcript");

    Ok(Transcript::from_segments(video_id, &segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_segments_in_order() {
        let segments = vec![
            TranscriptSegment::new("hello", 0.0, 2.0),
            TranscriptSegment::new("world", 2.0, 3.0),
        ];

        let transcript = Transcript::from_segments("dQw4w9WgXcQ", &segments);
        assert_eq!(transcript.video_id, "dQw4w9WgXcQ");
        assert_eq!(transcript.text, "hello world");
        assert_eq!(transcript.duration, 5.0);
    }

    #[test]
    fn test_duration_comes_from_last_segment() {
        let segments = vec![
            TranscriptSegment::new("a", 0.0, 100.0),
            TranscriptSegment::new("b", 10.0, 1.5),
            TranscriptSegment::new("c", 12.25, 0.75),
        ];

        let transcript = Transcript::from_segments("dQw4w9WgXcQ", &segments);
        assert_eq!(transcript.text, "a b c");
        assert_eq!(transcript.duration, 13.0);
    }

    #[test]
    fn test_empty_segments() {
        let transcript = Transcript::from_segments("dQw4w9WgXcQ", &[]);
        assert_eq!(transcript.text, "");
        assert_eq!(transcript.duration, 0.0);
    }

    struct FixedSegments;

    impl TranscriptApi for FixedSegments {
        async fn fetch_segments(&self, video_id: &str) -> anyhow::Result<Vec<TranscriptSegment>> {
            Ok(vec![TranscriptSegment::new(video_id, 0.0, 1.0)])
        }
    }

    #[tokio::test]
    async fn test_fetch_resolves_video_id_from_url() {
        let transcript = fetch_transcript(&FixedSegments, "https://youtu.be/dQw4w9WgXcQ?si=abc")
            .await
            .unwrap();

        assert_eq!(transcript.video_id, "dQw4w9WgXcQ");
        assert_eq!(transcript.text, "dQw4w9WgXcQ");
        assert_eq!(transcript.duration, 1.0);
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let err = fetch_transcript(&FixedSegments, "not a url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl));
    }
}
