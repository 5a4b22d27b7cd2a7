use std::fmt;

use crate::error::AnalysisError;

/// A candidate clip region in seconds, `0 <= start <= end <= duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl Window {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window of `clip_duration` centred on `peak`, shifted to fit `bounds`
    ///
    /// Shifting keeps the length at `clip_duration` unless the media itself is
    /// shorter, in which case the window covers the whole media.
    pub fn centered(peak: f64, clip_duration: f64, bounds: MediaBounds) -> Self {
        let half = clip_duration / 2.0;
        let mut start = peak - half;
        let mut end = peak + half;

        if start < 0.0 {
            start = 0.0;
            end = clip_duration.min(bounds.duration);
        }
        if end > bounds.duration {
            end = bounds.duration;
            start = (end - clip_duration).max(0.0);
        }

        Self { start, end }
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn within(&self, bounds: MediaBounds) -> bool {
        0.0 <= self.start && self.start <= self.end && self.end <= bounds.duration
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.start, self.end)
    }
}

/// Total duration of the source media; no window may extend past it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBounds {
    pub duration: f64,
}

impl MediaBounds {
    pub fn new(duration: f64) -> Result<Self, AnalysisError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnalysisError::invalid("video_duration", duration, "must be a positive number of seconds"));
        }
        Ok(Self { duration })
    }
}
