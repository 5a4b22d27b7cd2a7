use std::cmp::Ordering;

use rayon::prelude::*;

use crate::audio::types::{AudioSignal, Frame, FrameEnergy, Peak, PeakParams};
use crate::error::AnalysisError;

/// Finds the loudest moments of a signal by frame-wise RMS energy
///
/// Detection is a pure function of the signal and the parameters. Frames are
/// scored in parallel, but scores are collected in frame order and ranking
/// uses an explicit total order (energy descending, then frame index
/// ascending), so the output is identical on every run.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    params: PeakParams,
}

impl PeakDetector {
    pub fn new(params: PeakParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PeakParams {
        &self.params
    }

    /// Select the `topk` loudest frames, returned in ascending time order
    pub fn detect(&self, signal: &AudioSignal) -> Result<Vec<Peak>, AnalysisError> {
        let mut ranked = self.frame_energies(signal)?;
        ranked.sort_by(rank_order);
        ranked.truncate(self.params.topk);
        ranked.sort_by_key(|energy| energy.index);

        Ok(ranked.into_iter().map(Peak::from).collect())
    }

    /// Same as [`detect`](Self::detect) but only the timestamps
    pub fn detect_times(&self, signal: &AudioSignal) -> Result<Vec<f64>, AnalysisError> {
        Ok(self.detect(signal)?.into_iter().map(|peak| peak.time).collect())
    }

    /// RMS energy of every full frame, in frame order
    pub fn frame_energies(&self, signal: &AudioSignal) -> Result<Vec<FrameEnergy>, AnalysisError> {
        self.validate(signal)?;

        let PeakParams { frame_length, hop_length, .. } = self.params;
        let count = Frame::count(signal.len(), frame_length, hop_length);

        let energies = (0..count)
            .into_par_iter()
            .map(|index| {
                let start = index * hop_length;
                FrameEnergy {
                    index,
                    time: Frame::time(index, hop_length, signal.sample_rate),
                    rms: rms(&signal.samples[start..start + frame_length]),
                }
            })
            .collect();

        Ok(energies)
    }

    fn validate(&self, signal: &AudioSignal) -> Result<(), AnalysisError> {
        if self.params.frame_length == 0 {
            return Err(AnalysisError::invalid("frame_length", 0, "must be positive"));
        }
        if self.params.hop_length == 0 {
            return Err(AnalysisError::invalid("hop_length", 0, "must be positive"));
        }
        if signal.sample_rate == 0 {
            return Err(AnalysisError::invalid("sample_rate", 0, "must be positive"));
        }
        Ok(())
    }
}

/// Detect the timestamps of the `topk` loudest frames of `signal`
pub fn detect_rms_peaks(
    signal: &AudioSignal,
    topk: usize,
    frame_length: usize,
    hop_length: usize,
) -> Result<Vec<f64>, AnalysisError> {
    PeakDetector::new(PeakParams { topk, frame_length, hop_length }).detect_times(signal)
}

/// Root-mean-square amplitude, accumulated in f64
pub fn rms(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = frame
        .iter()
        .map(|&x| {
            let x = f64::from(x);
            x * x
        })
        .sum();
    (sum_sq / frame.len() as f64).sqrt()
}

// Loudest first; equal scores keep frame order. NaN (corrupt input) ranks last.
fn rank_order(a: &FrameEnergy, b: &FrameEnergy) -> Ordering {
    score(b.rms)
        .total_cmp(&score(a.rms))
        .then(a.index.cmp(&b.index))
}

fn score(rms: f64) -> f64 {
    if rms.is_nan() {
        f64::NEG_INFINITY
    } else {
        rms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(topk: usize, frame_length: usize, hop_length: usize) -> PeakDetector {
        PeakDetector::new(PeakParams { topk, frame_length, hop_length })
    }

    /// Quiet sine with louder bursts at the given (start, end) seconds
    fn signal_with_bursts(sample_rate: u32, seconds: f64, bursts: &[(f64, f64, f32)]) -> AudioSignal {
        let len = (sample_rate as f64 * seconds) as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                let gain = bursts
                    .iter()
                    .find(|(start, end, _)| t >= *start && t < *end)
                    .map(|(_, _, gain)| *gain)
                    .unwrap_or(0.05);
                (2.0 * std::f32::consts::PI * 220.0 * t as f32).sin() * gain
            })
            .collect();
        AudioSignal::new(samples, sample_rate)
    }

    #[test]
    fn test_rms_of_constant_frame() {
        assert_eq!(rms(&[0.5, -0.5, 0.5, -0.5]), 0.5);
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(rms(&[0.0; 16]), 0.0);
    }

    #[test]
    fn test_finds_loud_bursts_in_time_order() {
        // Each burst fills exactly one non-overlapping 100ms frame
        let signal = signal_with_bursts(8000, 10.0, &[(7.0, 7.1, 0.9), (2.0, 2.1, 0.6)]);
        let peaks = detector(2, 800, 800).detect(&signal).unwrap();

        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].frame_index, 20);
        assert_eq!(peaks[1].frame_index, 70);
        assert!(peaks[0].rms < peaks[1].rms);
        assert!((1.9..2.1).contains(&peaks[0].time), "first peak at {}", peaks[0].time);
        assert!((6.9..7.1).contains(&peaks[1].time), "second peak at {}", peaks[1].time);
    }

    #[test]
    fn test_ties_broken_by_frame_index() {
        // Every frame has identical energy
        let signal = AudioSignal::new(vec![0.25; 1000], 100);
        let peaks = detector(3, 100, 50).detect(&signal).unwrap();

        let indices: Vec<usize> = peaks.iter().map(|p| p.frame_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let times: Vec<f64> = peaks.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_tie_break_prefers_earlier_frame_over_later_equal() {
        // Frames 1 and 3 are equally loud, frame 2 slightly quieter
        let mut samples = vec![0.0f32; 500];
        samples[100..200].fill(0.8);
        samples[200..300].fill(0.7);
        samples[300..400].fill(0.8);
        let signal = AudioSignal::new(samples, 100);

        let peaks = detector(1, 100, 100).detect(&signal).unwrap();
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].frame_index, 1);
        assert_eq!(peaks[0].time, 1.0);
    }

    #[test]
    fn test_topk_larger_than_frame_count_returns_all() {
        let signal = signal_with_bursts(1000, 2.0, &[(1.0, 1.2, 0.8)]);
        let d = detector(500, 200, 100);
        let frames = d.frame_energies(&signal).unwrap().len();
        let times = d.detect_times(&signal).unwrap();

        assert_eq!(frames, 19);
        assert_eq!(times.len(), frames);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_signal_shorter_than_one_frame_is_empty() {
        let signal = AudioSignal::new(vec![0.9; 100], 22050);
        assert!(detector(5, 4096, 2048).detect(&signal).unwrap().is_empty());

        let empty = AudioSignal::new(vec![], 22050);
        assert!(detector(5, 4096, 2048).detect(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_zero_topk_returns_nothing() {
        let signal = AudioSignal::new(vec![0.3; 1000], 100);
        assert!(detector(0, 100, 50).detect(&signal).unwrap().is_empty());
    }

    #[test]
    fn test_partial_trailing_frame_is_dropped() {
        // Frames cover samples 0..4 and 4..8; the loud tail 8..10 is never scored
        let samples = vec![0.1, 0.1, 0.1, 0.1, 0.2, 0.2, 0.2, 0.2, 1.0, 1.0];
        let signal = AudioSignal::new(samples, 10);
        let d = detector(1, 4, 4);

        assert_eq!(d.frame_energies(&signal).unwrap().len(), 2);
        let peaks = d.detect(&signal).unwrap();
        assert_eq!(peaks[0].frame_index, 1);
        assert_eq!(peaks[0].time, 0.4);
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        let signal = AudioSignal::new(vec![0.1; 100], 100);

        let err = detector(3, 0, 10).detect(&signal).unwrap_err();
        assert_eq!(err.parameter(), "frame_length");

        let err = detector(3, 10, 0).detect(&signal).unwrap_err();
        assert_eq!(err.parameter(), "hop_length");

        let silent_rate = AudioSignal::new(vec![0.1; 100], 0);
        let err = detector(3, 10, 5).detect(&silent_rate).unwrap_err();
        assert_eq!(err.parameter(), "sample_rate");
    }

    #[test]
    fn test_parallel_energies_match_serial_reference() {
        let signal = signal_with_bursts(4000, 5.0, &[(1.0, 1.3, 0.7), (3.3, 3.4, 0.95)]);
        let (frame_length, hop_length) = (512, 128);
        let energies = detector(10, frame_length, hop_length).frame_energies(&signal).unwrap();

        let serial: Vec<f64> = signal
            .samples
            .windows(frame_length)
            .step_by(hop_length)
            .map(rms)
            .collect();

        assert_eq!(energies.len(), serial.len());
        for (energy, expected) in energies.iter().zip(serial) {
            assert_eq!(energy.rms, expected);
        }
    }

    #[test]
    fn test_detection_is_deterministic() {
        let signal = signal_with_bursts(8000, 6.0, &[(1.0, 1.5, 0.5), (4.0, 4.2, 0.5)]);
        let d = detector(8, 1024, 256);

        let first = d.detect(&signal).unwrap();
        for _ in 0..5 {
            assert_eq!(d.detect(&signal).unwrap(), first);
        }
    }

    #[test]
    fn test_peaks_stay_within_signal_duration() {
        let signal = signal_with_bursts(1000, 3.0, &[(2.8, 3.0, 1.0)]);
        let times = detect_rms_peaks(&signal, 4, 100, 30).unwrap();

        assert!(!times.is_empty());
        assert!(times.iter().all(|&t| t >= 0.0 && t <= signal.duration()));
    }
}
