use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::{segments_from_json3, TranscriptApi, TranscriptError, TranscriptSegment};

static INNERTUBE_API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap()
});

static CAPTION_FORMAT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"fmt=\w+").unwrap());

/// Fetches captions the way the YouTube Android client does: scrape the
/// innertube key off the watch page, ask the player endpoint for the caption
/// tracks, then download the chosen track as `json3`.
#[derive(Debug, Clone)]
pub struct YoutubeTranscriptApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTracklist {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `Some("asr")` for auto-generated captions
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_english(&self) -> bool {
        self.language_code == "en" || self.language_code.starts_with("en-")
    }

    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    /// The track url rewritten to request the `json3` caption format.
    fn json3_url(&self) -> String {
        if CAPTION_FORMAT_RE.is_match(&self.base_url) {
            CAPTION_FORMAT_RE
                .replace(&self.base_url, "fmt=json3")
                .into_owned()
        } else {
            format!("{}&fmt=json3", self.base_url)
        }
    }
}

/// Picks the caption track to download.
///
/// Preference: manual English, generated English, then whatever comes first.
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.is_english() && !t.is_generated())
        .or_else(|| tracks.iter().find(|t| t.is_english()))
        .or_else(|| tracks.first())
}

impl YoutubeTranscriptApi {
    const ANDROID_CLIENT_VERSION: &str = "20.10.38";

    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: "https://www.youtube.com".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Loads the watch page and pulls the innertube API key out of it
    #[tracing::instrument(skip(self))]
    async fn fetch_api_key(&self, video_id: &str) -> Result<String, TranscriptError> {
        let resp = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load watch page"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TranscriptError::Api { status, message });
        }

        let html = resp.text().await?;

        INNERTUBE_API_KEY_RE
            .captures(&html)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| TranscriptError::MissingApiKey(video_id.to_string()))
    }

    #[tracing::instrument(skip(self, api_key))]
    async fn fetch_caption_tracks(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<Vec<CaptionTrack>, TranscriptError> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": Self::ANDROID_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let resp = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to query player endpoint"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TranscriptError::Api { status, message });
        }

        let player = resp.json::<PlayerResponse>().await?;

        if let Some(playability) = player.playability_status {
            if playability.status != "OK" {
                return Err(TranscriptError::Unplayable {
                    video_id: video_id.to_string(),
                    reason: playability.reason.unwrap_or(playability.status),
                });
            }
        }

        let tracks = player
            .captions
            .and_then(|c| c.tracklist)
            .map(|t| t.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(TranscriptError::NoCaptions(video_id.to_string()));
        }

        Ok(tracks)
    }

    #[tracing::instrument(skip(self), fields(language = %track.language_code))]
    async fn fetch_track(
        &self,
        track: &CaptionTrack,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let resp = self
            .client
            .get(track.json3_url())
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to download caption track"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TranscriptError::Api { status, message });
        }

        let body = resp.text().await?;

        Ok(segments_from_json3(&body)?)
    }

    /// Fetches the preferred caption track of `video_id`
    pub async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let api_key = self.fetch_api_key(video_id).await?;
        let tracks = self.fetch_caption_tracks(video_id, &api_key).await?;

        let track = select_track(&tracks)
            .ok_or_else(|| TranscriptError::NoCaptions(video_id.to_string()))?;
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        self.fetch_track(track).await
    }
}

impl Default for YoutubeTranscriptApi {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl TranscriptApi for YoutubeTranscriptApi {
    async fn fetch_segments(&self, video_id: &str) -> anyhow::Result<Vec<TranscriptSegment>> {
        Ok(self.fetch(video_id).await?)
    }
}
