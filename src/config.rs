use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for auto-clipper
///
/// Every optional knob lives here with a documented default, so the pipeline
/// never has to thread nullable arguments around.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Loudness analysis settings
    pub audio: AudioConfig,

    /// Window construction and selection settings
    pub segments: SegmentConfig,

    /// ffmpeg rendering settings
    pub render: RenderConfig,

    /// Where downloads and clips are written
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.audio.validate()?;
        self.segments.validate()?;
        self.render.validate()?;
        Ok(())
    }
}

fn invalid<V: ToString>(key: &str, value: V) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Audio analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Rate the audio is resampled to before analysis (Hz)
    pub sample_rate: u32,

    /// Samples per energy frame
    pub frame_length: usize,

    /// Samples between consecutive frame starts
    pub hop_length: usize,

    /// How many loud peaks to consider
    pub topk: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            frame_length: 4096,
            hop_length: 2048,
            topk: 6,
        }
    }
}

impl AudioConfig {
    fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(invalid("audio.sample_rate", self.sample_rate).into());
        }

        if self.frame_length == 0 {
            return Err(invalid("audio.frame_length", self.frame_length).into());
        }

        if self.hop_length == 0 {
            return Err(invalid("audio.hop_length", self.hop_length).into());
        }

        if self.topk == 0 {
            return Err(invalid("audio.topk", self.topk).into());
        }

        Ok(())
    }
}

/// Segment construction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Target clip length in seconds
    pub clip_duration: f64,

    /// Windows closer than this many seconds are merged
    pub merge_margin: f64,

    /// Render at most this many clips; `None` renders every window
    pub max_clips: Option<usize>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            clip_duration: 25.0,
            merge_margin: 1.0,
            max_clips: Some(3),
        }
    }
}

impl SegmentConfig {
    fn validate(&self) -> Result<()> {
        if !self.clip_duration.is_finite() || self.clip_duration <= 0.0 {
            return Err(invalid("segments.clip_duration", self.clip_duration).into());
        }

        if !self.merge_margin.is_finite() || self.merge_margin < 0.0 {
            return Err(invalid("segments.merge_margin", self.merge_margin).into());
        }

        Ok(())
    }
}

/// ffmpeg output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Video codec passed to `-c:v`
    pub video_codec: String,

    /// Audio codec passed to `-c:a`
    pub audio_codec: String,

    /// Encoder preset passed to `-preset`
    pub preset: String,

    /// Render every clip at exactly `segments.clip_duration` instead of the
    /// merged window length
    pub fixed_duration: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "fast".to_string(),
            fixed_duration: true,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("render.resolution", format!("{}x{}", self.width, self.height)).into());
        }

        if self.video_codec.trim().is_empty() {
            return Err(invalid("render.video_codec", &self.video_codec).into());
        }

        if self.audio_codec.trim().is_empty() {
            return Err(invalid("render.audio_codec", &self.audio_codec).into());
        }

        Ok(())
    }
}

/// Output locations, passed explicitly to the fetcher and renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Rendered clips land here
    pub clips_dir: PathBuf,

    /// yt-dlp downloads land here
    pub downloads_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            clips_dir: PathBuf::from("clips"),
            downloads_dir: PathBuf::from("downloads"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("clipper.toml");

        let mut original_config = Config::default();
        original_config.segments.max_clips = Some(5);
        original_config.output.clips_dir = PathBuf::from("/tmp/out");

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[segments]\nclip_duration = 15.0\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.segments.clip_duration, 15.0);
        assert_eq!(config.segments.merge_margin, 1.0);
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = Config::from_file("/definitely/not/here.toml");
        assert!(matches!(
            result,
            Err(crate::error::ClipperError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_invalid_audio_config() {
        let mut config = Config::default();
        config.audio.hop_length = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.audio.topk = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_merge_margin_rejected() {
        let mut config = Config::default();
        config.segments.merge_margin = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_clip_duration_rejected() {
        let mut config = Config::default();
        config.segments.clip_duration = 0.0;
        assert!(config.validate().is_err());
    }
}
