use crate::error::AnalysisError;
use crate::segments::types::{MediaBounds, Window};

/// Turns peak timestamps into sorted, merged clip windows
///
/// Each peak gets a window of `clip_duration` centred on it and shifted to fit
/// the media. Windows are then sorted by start and swept left to right; a
/// window starting no later than `merge_margin` seconds after the previous
/// window ends is absorbed into it. Merging only ever extends `end`, so every
/// output window is at least `clip_duration` long unless the media is shorter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBuilder {
    clip_duration: f64,
    merge_margin: f64,
}

impl SegmentBuilder {
    /// Validates both parameters up front; a negative margin is rejected
    pub fn new(clip_duration: f64, merge_margin: f64) -> Result<Self, AnalysisError> {
        if !clip_duration.is_finite() || clip_duration <= 0.0 {
            return Err(AnalysisError::invalid("clip_duration", clip_duration, "must be a positive number of seconds"));
        }
        if !merge_margin.is_finite() || merge_margin < 0.0 {
            return Err(AnalysisError::invalid("merge_margin", merge_margin, "must be zero or a positive number of seconds"));
        }
        Ok(Self { clip_duration, merge_margin })
    }

    pub fn clip_duration(&self) -> f64 {
        self.clip_duration
    }

    pub fn merge_margin(&self) -> f64 {
        self.merge_margin
    }

    /// Build the final window list; no peaks means no windows
    pub fn build(&self, peaks: &[f64], bounds: MediaBounds) -> Result<Vec<Window>, AnalysisError> {
        if let Some(&bad) = peaks.iter().find(|t| !t.is_finite()) {
            return Err(AnalysisError::invalid("peaks", bad, "timestamps must be finite"));
        }

        let windows = self.raw_windows(peaks, bounds);
        Ok(merge_windows(windows, self.merge_margin))
    }

    /// One clamped window per peak, in peak order
    pub fn raw_windows(&self, peaks: &[f64], bounds: MediaBounds) -> Vec<Window> {
        peaks
            .iter()
            .map(|&peak| Window::centered(peak, self.clip_duration, bounds))
            .collect()
    }
}

/// Sort by start and merge windows separated by at most `merge_margin`
///
/// The sort is stable, so windows with equal starts keep their input order.
/// Running this again on its own output returns the same windows.
pub fn merge_windows(mut windows: Vec<Window>, merge_margin: f64) -> Vec<Window> {
    windows.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Window> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.start <= last.end + merge_margin => {
                last.end = last.end.max(window.end);
            }
            _ => merged.push(window),
        }
    }
    merged
}

/// Four-argument form: validate, window, clamp, sort and merge in one call
pub fn build_candidates(
    peaks: &[f64],
    clip_duration: f64,
    video_duration: f64,
    merge_margin: f64,
) -> Result<Vec<Window>, AnalysisError> {
    let builder = SegmentBuilder::new(clip_duration, merge_margin)?;
    let bounds = MediaBounds::new(video_duration)?;
    builder.build(peaks, bounds)
}
