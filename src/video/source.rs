use std::fmt;
use std::path::{Path, PathBuf};

/// Where the input video comes from
///
/// Only the driver deals in sources; analysis only ever sees decoded samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Anything yt-dlp can fetch, identified by URL
    Remote(String),

    /// A video file already on disk
    Local(PathBuf),
}

impl MediaSource {
    /// Classify a command-line argument: anything starting with `http` is remote
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.to_ascii_lowercase().starts_with("http") {
            Self::Remote(trimmed.to_string())
        } else {
            Self::Local(PathBuf::from(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }
}

impl From<&str> for MediaSource {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_remote() {
        assert_eq!(
            MediaSource::parse("https://www.youtube.com/watch?v=abc"),
            MediaSource::Remote("https://www.youtube.com/watch?v=abc".to_string())
        );
        assert!(MediaSource::parse("HTTP://example.com/v.mp4").is_remote());
    }

    #[test]
    fn test_paths_are_local() {
        let source = MediaSource::parse("videos/talk.mp4");
        assert_eq!(source.local_path(), Some(Path::new("videos/talk.mp4")));
        assert!(!MediaSource::from("/abs/http_dump.mp4").is_remote());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored_for_both_kinds() {
        assert_eq!(
            MediaSource::parse("  videos/talk.mp4\n"),
            MediaSource::Local(PathBuf::from("videos/talk.mp4"))
        );
        assert_eq!(
            MediaSource::parse(" https://youtu.be/abc "),
            MediaSource::Remote("https://youtu.be/abc".to_string())
        );
    }
}
