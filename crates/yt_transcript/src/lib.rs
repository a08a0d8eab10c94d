//! # Transcript Module
//!
//! This module retrieves the timed captions of a YouTube video.
//!
//! Callers depend on the [`TranscriptApi`] abstraction; [`YoutubeTranscriptApi`]
//! implements it against YouTube's innertube player endpoint and the
//! `timedtext` caption download.

mod api;
mod error;
mod segment;

pub use api::youtube::{select_track, CaptionTrack, YoutubeTranscriptApi};
pub use api::TranscriptApi;
pub use error::TranscriptError;
pub use segment::{segments_from_json3, TranscriptSegment};
