use std::path::{Path, PathBuf};

use crate::audio::{AudioLoader, AudioSignal};
use crate::config::Config;
use crate::error::Result;
use crate::video::{ClipRenderer, DurationProbe, RenderJob, VideoFetcher};

/// The pipeline's collaborators that do I/O
///
/// Every method blocks; the pipeline calls them from `spawn_blocking`.
pub trait MediaBackend: Send + Sync {
    /// Download a remote video and return its local path
    fn fetch(&self, url: &str) -> Result<PathBuf>;

    /// Total media duration in seconds
    fn probe_duration(&self, video: &Path) -> Result<f64>;

    /// Mono audio at (ideally) `sample_rate`
    fn decode_audio(&self, video: &Path, sample_rate: u32) -> Result<AudioSignal>;

    /// Render one planned clip and return the written file
    fn render(&self, video: &Path, job: &RenderJob) -> Result<PathBuf>;
}

/// yt-dlp, ffprobe, symphonia and ffmpeg
#[derive(Debug, Clone)]
pub struct ExternalTools {
    fetcher: VideoFetcher,
    renderer: ClipRenderer,
}

impl ExternalTools {
    pub fn from_config(config: &Config) -> Self {
        Self {
            fetcher: VideoFetcher::new(config.output.downloads_dir.clone()),
            renderer: ClipRenderer::new(config.render.clone(), config.output.clips_dir.clone()),
        }
    }
}

impl MediaBackend for ExternalTools {
    fn fetch(&self, url: &str) -> Result<PathBuf> {
        self.fetcher.fetch(url)
    }

    fn probe_duration(&self, video: &Path) -> Result<f64> {
        DurationProbe::probe(video)
    }

    fn decode_audio(&self, video: &Path, sample_rate: u32) -> Result<AudioSignal> {
        AudioLoader::load_blocking(video, sample_rate)
    }

    fn render(&self, video: &Path, job: &RenderJob) -> Result<PathBuf> {
        self.renderer.render(video, job)
    }
}
