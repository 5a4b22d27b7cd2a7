use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{Result, VideoError};
use crate::video::tools::{display_command, require_tool, stderr_excerpt};

/// Reads the total duration of a media file with ffprobe
///
/// A failed probe is an error; no estimated duration is ever substituted.
pub struct DurationProbe;

impl DurationProbe {
    pub fn command(path: &Path) -> Command {
        let mut cmd = Command::new("ffprobe");
        cmd.args([
            "-v", "error",
            "-show_entries", "format=duration",
            "-of", "default=noprint_wrappers=1:nokey=1",
        ]);
        cmd.arg(path);
        cmd
    }

    /// Duration of `path` in seconds
    pub fn probe(path: &Path) -> Result<f64> {
        require_tool("ffprobe", "-version")?;

        let mut cmd = Self::command(path);
        debug!("Running: {}", display_command(&cmd));

        let output = cmd.output().map_err(|e| VideoError::ProbeFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(VideoError::ProbeFailed {
                path: path.display().to_string(),
                reason: stderr_excerpt(&output, 200),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_duration(&stdout).ok_or_else(|| {
            VideoError::ProbeFailed {
                path: path.display().to_string(),
                reason: format!("unexpected ffprobe output: {:?}", stdout.trim()),
            }
            .into()
        })
    }

    /// Parse ffprobe's bare `format=duration` output
    pub fn parse_duration(stdout: &str) -> Option<f64> {
        let duration: f64 = stdout.trim().parse().ok()?;
        (duration.is_finite() && duration >= 0.0).then_some(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(DurationProbe::parse_duration("63.482000\n"), Some(63.482));
        assert_eq!(DurationProbe::parse_duration("  12  "), Some(12.0));
        assert_eq!(DurationProbe::parse_duration("N/A\n"), None);
        assert_eq!(DurationProbe::parse_duration(""), None);
        assert_eq!(DurationProbe::parse_duration("-4.0"), None);
    }

    #[test]
    fn test_command_arguments() {
        let cmd = DurationProbe::command(Path::new("downloads/abc.mp4"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), "ffprobe");
        assert_eq!(
            args,
            [
                "-v", "error",
                "-show_entries", "format=duration",
                "-of", "default=noprint_wrappers=1:nokey=1",
                "downloads/abc.mp4",
            ]
        );
    }
}
