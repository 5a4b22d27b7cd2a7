//! # Video Module
//!
//! Everything that touches the source video or the rendered clips through
//! external tools: yt-dlp for downloads, ffprobe for the duration, ffmpeg
//! for cutting vertical clips.

pub mod fetch;
pub mod probe;
pub mod renderer;
pub mod source;
pub mod tools;

pub use fetch::VideoFetcher;
pub use probe::DurationProbe;
pub use renderer::{ClipRenderer, RenderJob};
pub use source::MediaSource;
