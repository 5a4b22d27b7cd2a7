//! # Audio Module
//!
//! Decodes a media file's audio track and finds its loudest moments.
//!
//! ## Core Features
//!
//! - **Decoding**: WAV through hound, every other container through symphonia,
//!   mixed down to mono
//! - **Resampling**: rubato FFT resampler to the analysis rate
//! - **Peak Detection**: frame-wise RMS energy with deterministic top-K selection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use auto_clipper::audio::{AudioLoader, PeakDetector, PeakParams};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let signal = AudioLoader::load("talk.mp4", 22050).await?;
//!
//! let detector = PeakDetector::new(PeakParams { topk: 6, ..Default::default() });
//! for peak in detector.detect(&signal)? {
//!     println!("{:.2}s (rms {:.3})", peak.time, peak.rms);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod loader;
pub mod resample;
pub mod types;
pub use analyzer::{detect_rms_peaks, PeakDetector};
pub use loader::AudioLoader;
pub use types::{AudioSignal, Frame, FrameEnergy, Peak, PeakParams};
