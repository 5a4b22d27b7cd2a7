use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use tracing::{debug, info};

use crate::error::{Result, VideoError};
use crate::video::tools::{display_command, require_tool};

/// Prefer an mp4/m4a pair so the result needs no remuxing
const DEFAULT_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best";

/// Downloads remote videos with yt-dlp into a configured directory
#[derive(Debug, Clone)]
pub struct VideoFetcher {
    downloads_dir: PathBuf,
    format: String,
}

impl VideoFetcher {
    pub fn new<P: Into<PathBuf>>(downloads_dir: P) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// yt-dlp invocation writing `<downloads>/<video id>.<ext>`
    pub fn command(&self, url: &str) -> Command {
        let template = self.downloads_dir.join("%(id)s.%(ext)s");
        let mut cmd = Command::new("yt-dlp");
        cmd.args(["-f", self.format.as_str(), "-o"]);
        cmd.arg(template);
        cmd.arg(url);
        cmd
    }

    /// Download `url` and return the path of the resulting mp4
    pub fn fetch(&self, url: &str) -> Result<PathBuf> {
        require_tool("yt-dlp", "--version")?;
        fs::create_dir_all(&self.downloads_dir)?;

        let mut cmd = self.command(url);
        info!("Running: {}", display_command(&cmd));

        // yt-dlp's own progress output goes straight to the terminal
        let status = cmd.status().map_err(|e| VideoError::DownloadFailed {
            reason: format!("could not start yt-dlp: {}", e),
        })?;

        if !status.success() {
            return Err(VideoError::DownloadFailed {
                reason: "yt-dlp exited with an error. Check the URL or network connection.".to_string(),
            }
            .into());
        }

        let video = newest_mp4(&self.downloads_dir)?.ok_or_else(|| VideoError::DownloadFailed {
            reason: format!("yt-dlp completed, but no MP4 file was found in {}", self.downloads_dir.display()),
        })?;

        debug!("Downloaded video: {}", video.display());
        Ok(video)
    }
}

/// Most recently modified `.mp4` directly inside `dir`
pub fn newest_mp4(dir: &Path) -> Result<Option<PathBuf>> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_mp4 = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("mp4"))
            .unwrap_or(false);
        if !is_mp4 || !path.is_file() {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        if newest.as_ref().map_or(true, |(best, _)| modified > *best) {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::tempdir;

    fn touch(path: &Path, age_secs: u64) {
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs)).unwrap();
    }

    #[test]
    fn test_newest_mp4_picks_latest_video() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("old.mp4"), 3600);
        touch(&dir.path().join("new.MP4"), 10);
        touch(&dir.path().join("newer.part"), 0);

        let newest = newest_mp4(dir.path()).unwrap();
        assert_eq!(newest, Some(dir.path().join("new.MP4")));
    }

    #[test]
    fn test_newest_mp4_in_empty_dir() {
        let dir = tempdir().unwrap();
        assert_eq!(newest_mp4(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_command_arguments() {
        let fetcher = VideoFetcher::new("downloads");
        let cmd = fetcher.command("https://youtu.be/xyz");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(cmd.get_program(), "yt-dlp");
        assert_eq!(args[0], "-f");
        assert_eq!(args[1], DEFAULT_FORMAT);
        assert_eq!(args[2], "-o");
        assert_eq!(PathBuf::from(&args[3]), Path::new("downloads").join("%(id)s.%(ext)s"));
        assert_eq!(args[4], "https://youtu.be/xyz");
    }
}
