use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use yt_transcript::{TranscriptApi, TranscriptSegment};

#[derive(Clone, Default)]
pub struct MockTranscriptApi {
    pub segments: Vec<TranscriptSegment>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    /// Never resolves; `dropped` flips once the pending fetch is abandoned
    pub hang: bool,
    pub dropped: Arc<AtomicBool>,
}

impl MockTranscriptApi {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Default::default()
        }
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl TranscriptApi for MockTranscriptApi {
    async fn fetch_segments(&self, video_id: &str) -> anyhow::Result<Vec<TranscriptSegment>> {
        self.calls.lock().unwrap().push(video_id.to_string());

        if self.hang {
            let _flag = DropFlag(self.dropped.clone());
            std::future::pending::<()>().await;
        }

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        Ok(self.segments.clone())
    }
}
