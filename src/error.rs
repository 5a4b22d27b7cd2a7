use thiserror::Error;

/// Main error type for the auto-clipper library
#[derive(Error, Debug)]
pub enum ClipperError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Parameter validation failures raised by peak detection and segment building
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl AnalysisError {
    pub(crate) fn invalid<V: ToString>(name: &'static str, value: V, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Name of the offending parameter
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidParameter { name, .. } => *name,
        }
    }
}

/// Audio-specific errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio from: {path}")]
    LoadFailed { path: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("No decodable audio track in: {path}")]
    NoAudioTrack { path: String },

    #[error("Audio decoding failed for {path}: {reason}")]
    DecodeFailed { path: String, reason: String },

    #[error("Resampling failed: {reason}")]
    ResampleFailed { reason: String },
}

/// Video-specific errors: fetching, probing and rendering
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Local file not found: {path}")]
    SourceNotFound { path: String },

    #[error("Required tool not found on PATH: {tool}")]
    ToolNotFound { tool: String },

    #[error("Download failed: {reason}")]
    DownloadFailed { reason: String },

    #[error("Duration probe failed for {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("Clip rendering failed: {reason}")]
    RenderFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ClipperError
pub type Result<T> = std::result::Result<T, ClipperError>;

impl ClipperError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Video(VideoError::SourceNotFound { path }) => {
                format!("Could not find '{}'. Pass an http(s) URL or an existing video file.", path)
            }
            Self::Video(VideoError::ToolNotFound { tool }) => {
                format!("'{}' is required but was not found. Please install it and make sure it is on PATH.", tool)
            }
            Self::Audio(AudioError::LoadFailed { path }) => {
                format!("Could not read audio from '{}'. Please check the file has an audio track in a supported format.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
