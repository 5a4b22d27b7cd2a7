use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::error::{Result, VideoError};
use crate::segments::Window;
use crate::video::tools::{display_command, require_tool, stderr_excerpt};

/// One ffmpeg invocation: cut `duration` seconds from `start` into `output`
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// 1-based position in the render order
    pub index: usize,

    /// Seek position in seconds
    pub start: f64,

    /// Length of the output clip in seconds
    pub duration: f64,

    /// Output file path
    pub output: PathBuf,
}

/// Crops windows of the source to vertical 9:16 clips with ffmpeg
#[derive(Debug, Clone)]
pub struct ClipRenderer {
    config: RenderConfig,
    clips_dir: PathBuf,
}

impl ClipRenderer {
    pub fn new<P: Into<PathBuf>>(config: RenderConfig, clips_dir: P) -> Self {
        Self {
            config,
            clips_dir: clips_dir.into(),
        }
    }

    pub fn clips_dir(&self) -> &Path {
        &self.clips_dir
    }

    /// Output path used when the caller does not name one
    pub fn default_output_path(&self, start: f64) -> PathBuf {
        self.clips_dir.join(format!("clip_{}.mp4", start.max(0.0) as u64))
    }

    /// Render jobs for `windows`, numbered from 1 in window order
    ///
    /// With `fixed_duration` every clip runs `clip_duration` seconds from its
    /// window start; otherwise it spans the (possibly merged) window.
    pub fn plan(&self, windows: &[Window], clip_duration: f64) -> Vec<RenderJob> {
        windows
            .iter()
            .enumerate()
            .map(|(i, window)| RenderJob {
                index: i + 1,
                start: window.start,
                duration: if self.config.fixed_duration {
                    clip_duration
                } else {
                    window.duration().max(0.0)
                },
                output: self.clips_dir.join(format!("clip_{}.mp4", i + 1)),
            })
            .collect()
    }

    /// The ffmpeg command for a single clip
    pub fn command(&self, video: &Path, start: f64, duration: f64, output: &Path) -> Command {
        let filter = format!(
            "crop=in_h*9/16:in_h,scale={}:{}",
            self.config.width, self.config.height
        );

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .args(["-ss", format!("{:.3}", start).as_str()])
            .arg("-i")
            .arg(video)
            .args(["-t", format!("{:.3}", duration).as_str()])
            .args(["-vf", filter.as_str()])
            .args(["-c:v", self.config.video_codec.as_str()])
            .args(["-preset", self.config.preset.as_str()])
            .args(["-c:a", self.config.audio_codec.as_str()])
            .arg(output);
        cmd
    }

    /// Render one clip, defaulting the output name from `start`
    pub fn render_clip(&self, video: &Path, start: f64, duration: f64, output: Option<PathBuf>) -> Result<PathBuf> {
        let output = output.unwrap_or_else(|| self.default_output_path(start));
        self.run(video, start, duration, &output)?;
        Ok(output)
    }

    /// Render a planned job
    pub fn render(&self, video: &Path, job: &RenderJob) -> Result<PathBuf> {
        info!("Rendering clip {}: start={:.2}, duration={:.2}", job.index, job.start, job.duration);
        self.run(video, job.start, job.duration, &job.output)?;
        Ok(job.output.clone())
    }

    fn run(&self, video: &Path, start: f64, duration: f64, output: &Path) -> Result<()> {
        require_tool("ffmpeg", "-version")?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut cmd = self.command(video, start, duration, output);
        debug!("Running: {}", display_command(&cmd));

        let result = cmd.output().map_err(|e| VideoError::RenderFailed {
            reason: format!("could not start ffmpeg: {}", e),
        })?;

        if !result.status.success() {
            return Err(VideoError::RenderFailed {
                reason: format!("ffmpeg failed on {}: {}", output.display(), stderr_excerpt(&result, 400)),
            }
            .into());
        }

        Ok(())
    }
}
