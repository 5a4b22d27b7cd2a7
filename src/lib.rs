//! # Auto-Clipper
//!
//! Turn a long video into short vertical clips centred on its loudest moments.
//!
//! The library downloads (or takes) a video, scores its audio track with
//! frame-level RMS energy, keeps the top-K loudest frames, builds clamped and
//! merged windows around them, and renders each window as a 9:16 clip.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use auto_clipper::{ClipPipeline, Config, MediaSource};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let pipeline = ClipPipeline::new(Config::default());
//! let report = pipeline
//!     .run(&MediaSource::parse("https://www.youtube.com/watch?v=abc123"))
//!     .await?;
//!
//! for clip in &report.clips {
//!     println!("{}", clip.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`audio`] - Audio decoding and loudness peak detection
//! - [`segments`] - Window construction and merging
//! - [`video`] - Downloading, probing and rendering through external tools
//! - [`pipeline`] - End-to-end orchestration
//! - [`config`] - Configuration management
//!
//! The analysis stages are pure and usable on their own:
//!
//! ```rust
//! use auto_clipper::{audio::detect_rms_peaks, audio::AudioSignal, segments::build_candidates};
//!
//! let mut samples = vec![0.0f32; 1000];
//! samples[300..400].fill(1.0);
//! let signal = AudioSignal::new(samples, 100);
//!
//! let peaks = detect_rms_peaks(&signal, 1, 100, 100).unwrap();
//! assert_eq!(peaks, vec![3.0]);
//!
//! let windows = build_candidates(&peaks, 4.0, 10.0, 1.0).unwrap();
//! assert_eq!(windows[0].start, 1.0);
//! assert_eq!(windows[0].end, 5.0);
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod segments;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    audio::PeakDetector,
    config::Config,
    error::{ClipperError, Result},
    pipeline::{ClipPipeline, ClipReport},
    segments::{SegmentBuilder, Window},
    video::MediaSource,
};
