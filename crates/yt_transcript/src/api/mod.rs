use std::future::Future;

use crate::TranscriptSegment;

pub mod youtube;

pub trait TranscriptApi {
    /// Returns the caption segments of `video_id` in playback order.
    fn fetch_segments(
        &self,
        video_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<TranscriptSegment>>> + Send;
}

impl<T: TranscriptApi + Send + Sync> TranscriptApi for &T {
    async fn fetch_segments(&self, video_id: &str) -> anyhow::Result<Vec<TranscriptSegment>> {
        (**self).fetch_segments(video_id).await
    }
}
