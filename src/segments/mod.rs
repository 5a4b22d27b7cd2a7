//! # Segments Module
//!
//! Converts loudness peaks into the clip windows handed to the renderer.
//! Everything here is pure: no I/O, no logging, no retained state.
//!
//! ```rust
//! use auto_clipper::segments::{build_candidates, Window};
//!
//! let windows = build_candidates(&[5.0, 6.0, 50.0], 10.0, 60.0, 1.0).unwrap();
//! assert_eq!(windows, vec![Window::new(0.0, 11.0), Window::new(45.0, 55.0)]);
//! ```

pub mod builder;
pub mod types;

pub use builder::{build_candidates, merge_windows, SegmentBuilder};
pub use types::{MediaBounds, Window};
