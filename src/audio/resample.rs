use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

use crate::error::{AudioError, Result};

const CHUNK_SIZE: usize = 1024;

/// Resample mono audio to `to_rate`
///
/// The output stays time-aligned with the input: sample `i` corresponds to
/// `i / to_rate` seconds. Returns the input unchanged when the rates already match.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples);
    }

    let channels = 1;
    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        channels,
        FixedSync::Both,
    )
    .map_err(|e| AudioError::ResampleFailed { reason: e.to_string() })?;

    let chunk = resampler.input_frames_next();
    let delay = resampler.output_delay();
    let expected = output_len(samples.len(), from_rate, to_rate);
    let mut output = Vec::with_capacity(delay + expected + CHUNK_SIZE);

    // Past the end of the signal the input is all zeros, which flushes the
    // resampler's latency
    let mut pos = 0;
    while output.len() < delay + expected {
        let start = pos.min(samples.len());
        let end = (pos + chunk).min(samples.len());
        let mut input = samples[start..end].to_vec();
        input.resize(chunk, 0.0);

        let adapter = SequentialSlice::new(&input, channels, chunk)
            .map_err(|e| AudioError::ResampleFailed { reason: format!("input adapter: {e}") })?;
        let resampled = resampler
            .process(&adapter, 0, None)
            .map_err(|e| AudioError::ResampleFailed { reason: e.to_string() })?;

        output.extend_from_slice(&resampled.take_data());
        pos += chunk;
    }

    // Output sample `i` is input time `(i - delay) / to_rate` until the delay is dropped
    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}

fn output_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    (input_len as f64 * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(samples.clone(), 22050, 22050).unwrap(), samples);
    }

    #[test]
    fn test_downsample_length() {
        let samples: Vec<f32> = (0..48000).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample(samples, 48000, 22050).unwrap();
        assert!(output.len() > 20000 && output.len() <= 22050, "got {}", output.len());
    }

    #[test]
    fn test_upsample_length() {
        let samples: Vec<f32> = (0..16000).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample(samples, 16000, 22050).unwrap();
        assert!(output.len() > 20000 && output.len() <= 22050, "got {}", output.len());
    }

    fn loudest_index(samples: &[f32]) -> usize {
        samples
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_impulse_stays_at_its_timestamp() {
        let mut samples = vec![0.0f32; 32000];
        samples[16000] = 1.0;

        let output = resample(samples, 16000, 22050).unwrap();
        assert_eq!(output.len(), 44100);

        let peak = loudest_index(&output);
        assert!(peak.abs_diff(22050) <= 3, "impulse at 1.0s landed at sample {}", peak);
    }

    #[test]
    fn test_tail_is_not_lost() {
        let mut samples = vec![0.0f32; 48000];
        samples[47000] = 1.0;

        let output = resample(samples, 48000, 22050).unwrap();
        let peak = loudest_index(&output);
        let expected = (47000.0 * 22050.0 / 48000.0) as usize;
        assert!(peak.abs_diff(expected) <= 3, "impulse near the end landed at sample {}", peak);
    }
}
