use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::i24;
use tokio::task;
use tracing::{debug, warn};

use crate::audio::resample::resample;
use crate::audio::types::AudioSignal;
use crate::error::{AudioError, ClipperError, Result};

/// Decodes the audio track of a media file into a mono [`AudioSignal`]
pub struct AudioLoader;

impl AudioLoader {
    /// Load the audio of `path`, mixed to mono and resampled to `sample_rate`
    ///
    /// The returned signal carries the rate actually used.
    pub async fn load<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<AudioSignal> {
        let path = path.as_ref().to_path_buf();
        task::spawn_blocking(move || Self::load_blocking(&path, sample_rate))
            .await
            .map_err(|e| ClipperError::generic(format!("Audio decode task failed: {}", e)))?
    }

    /// Synchronous variant of [`load`](Self::load)
    pub fn load_blocking(path: &Path, sample_rate: u32) -> Result<AudioSignal> {
        let extension = Self::detect_format(path).unwrap_or_default();

        let (samples, native_rate) = match extension.as_str() {
            "wav" => Self::load_wav(path)?,
            ext if Self::is_format_supported(ext) => Self::load_with_symphonia(path)?,
            _ => return Err(AudioError::UnsupportedFormat { format: extension.clone() }.into()),
        };

        debug!(
            "Decoded {} mono samples at {} Hz from {}",
            samples.len(),
            native_rate,
            path.display()
        );

        let samples = resample(samples, native_rate, sample_rate)?;
        Ok(AudioSignal::new(samples, sample_rate))
    }

    /// Load WAV files using the hound crate (most reliable for WAV)
    fn load_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
        let load_failed = || AudioError::LoadFailed { path: path.display().to_string() };

        let reader = hound::WavReader::open(path).map_err(|_| load_failed())?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| load_failed())?,
            hound::SampleFormat::Int => {
                let bit_depth = spec.bits_per_sample;
                reader
                    .into_samples::<i32>()
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|_| load_failed())?
                    .into_iter()
                    .map(|sample| Self::int_to_float(sample, bit_depth))
                    .collect()
            }
        };

        Ok((Self::mix_to_mono(&interleaved, spec.channels as usize), spec.sample_rate))
    }

    /// Load any container symphonia can demux (mp4, mkv, webm, mp3, ...)
    fn load_with_symphonia(path: &Path) -> Result<(Vec<f32>, u32)> {
        let file = File::open(path)
            .map_err(|_| AudioError::LoadFailed { path: path.display().to_string() })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|_| AudioError::LoadFailed { path: path.display().to_string() })?;

        let mut format = probed.format;

        // Video containers list the picture track first
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
            .ok_or_else(|| AudioError::NoAudioTrack { path: path.display().to_string() })?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AudioError::NoAudioTrack { path: path.display().to_string() })?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodeFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    return Err(AudioError::DecodeFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                    .into())
                }
            };

            while !format.metadata().is_latest() {
                format.metadata().pop();
            }

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => Self::append_mono(&decoded, &mut samples),
                Err(SymphoniaError::DecodeError(reason)) => {
                    // A corrupt packet costs a few milliseconds of audio, not the whole run
                    warn!("Skipping undecodable packet in {}: {}", path.display(), reason);
                }
                Err(e) => {
                    return Err(AudioError::DecodeFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                    .into())
                }
            }
        }

        Ok((samples, sample_rate))
    }

    /// Convert integer sample to float (-1.0 to 1.0)
    ///
    /// hound already re-centres unsigned 8-bit WAV data around zero.
    fn int_to_float(sample: i32, bit_depth: u16) -> f32 {
        match bit_depth {
            8 => sample as f32 / 128.0,
            16 => sample as f32 / 32768.0,
            24 => sample as f32 / 8388608.0,
            32 => sample as f32 / 2147483648.0,
            _ => sample as f32 / 32768.0,
        }
    }

    /// Average interleaved frames down to a single channel
    fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
        if channels <= 1 {
            return interleaved.to_vec();
        }

        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    }

    /// Mix a decoded symphonia buffer to mono and append it to `output`
    fn append_mono(buffer: &AudioBufferRef, output: &mut Vec<f32>) {
        macro_rules! mix {
            ($buf:expr, $convert:expr) => {{
                let convert = $convert;
                let channels = $buf.spec().channels.count();
                for frame_idx in 0..$buf.frames() {
                    let sum: f32 = (0..channels).map(|ch| convert($buf.chan(ch)[frame_idx])).sum();
                    output.push(sum / channels.max(1) as f32);
                }
            }};
        }

        match buffer {
            AudioBufferRef::F32(buf) => mix!(buf, |s: f32| s),
            AudioBufferRef::F64(buf) => mix!(buf, |s: f64| s as f32),
            AudioBufferRef::S32(buf) => mix!(buf, |s: i32| s as f32 / 2147483648.0),
            AudioBufferRef::S24(buf) => mix!(buf, |s: i24| s.inner() as f32 / 8388608.0),
            AudioBufferRef::S16(buf) => mix!(buf, |s: i16| f32::from(s) / 32768.0),
            AudioBufferRef::U8(buf) => mix!(buf, |s: u8| (f32::from(s) - 128.0) / 128.0),
            _ => {
                warn!("Unsupported audio buffer format, skipping packet");
            }
        }
    }

    /// Detect media format from file extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Check if a file format can be decoded
    pub fn is_format_supported(extension: &str) -> bool {
        matches!(
            extension.to_lowercase().as_str(),
            "wav" | "mp4" | "m4a" | "mov" | "mkv" | "webm" | "mp3" | "flac" | "ogg" | "aac"
        )
    }
}
