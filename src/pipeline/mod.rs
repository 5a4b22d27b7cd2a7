//! # Pipeline Module
//!
//! Orchestrates a full run: resolve the source, probe its duration, find
//! the loudest moments, build merged windows and render vertical clips.
//!
//! I/O goes through [`MediaBackend`] so the orchestration can be exercised
//! without yt-dlp or ffmpeg installed.

pub mod backend;
pub mod engine;

pub use backend::{ExternalTools, MediaBackend};
pub use engine::{ClipPipeline, ClipReport};
