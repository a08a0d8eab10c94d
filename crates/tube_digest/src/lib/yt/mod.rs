pub mod transcript;

use std::sync::LazyLock;

use regex::Regex;

pub use transcript::{fetch_transcript, Transcript};

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11}).*").unwrap());

/// Extracts the 11 character video id from a YouTube url.
///
/// Matches the first `v=` or `/` that is directly followed by eleven id
/// characters, so `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/` forms all
/// resolve. The id is not checked against YouTube.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120s&list=PL1"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://m.youtube.com/watch?feature=share&v=a-B_c1D2e3F"),
            Some("a-B_c1D2e3F")
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abcdef"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_embed_and_shorts_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_invalid_urls() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
    }
}
