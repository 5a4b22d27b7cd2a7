use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;
use tracing::{debug, info};

use crate::{
    audio::{Peak, PeakDetector, PeakParams},
    config::Config,
    error::{ClipperError, Result, VideoError},
    pipeline::backend::{ExternalTools, MediaBackend},
    segments::{MediaBounds, SegmentBuilder, Window},
    video::{ClipRenderer, MediaSource},
};

/// What a pipeline run found and produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipReport {
    /// Local video the clips were cut from
    pub video: PathBuf,

    /// Probed duration in seconds
    pub duration: f64,

    /// Loudest moments, ascending by time
    pub peaks: Vec<Peak>,

    /// Every merged window, ascending by start
    pub segments: Vec<Window>,

    /// Rendered files, one per selected window; empty on a dry run
    pub clips: Vec<PathBuf>,
}

impl ClipReport {
    pub fn peak_times(&self) -> Vec<f64> {
        self.peaks.iter().map(|peak| peak.time).collect()
    }
}

/// Runs source -> loud moments -> windows -> vertical clips
///
/// 1. Source resolution - download remote sources, check local ones exist
/// 2. Duration probe - media bounds for clamping
/// 3. Loudness analysis - decode audio, pick the top-K RMS frames
/// 4. Segment building - clamp and merge windows around the peaks
/// 5. Rendering - cut the first `max_clips` windows
pub struct ClipPipeline {
    config: Config,
    backend: Arc<dyn MediaBackend>,
}

impl ClipPipeline {
    /// Pipeline backed by the real external tools
    pub fn new(config: Config) -> Self {
        let backend = Arc::new(ExternalTools::from_config(&config));
        Self { config, backend }
    }

    pub fn with_backend(config: Config, backend: Arc<dyn MediaBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full run including rendering
    pub async fn run(&self, source: &MediaSource) -> Result<ClipReport> {
        self.execute(source, true).await
    }

    /// Everything up to rendering; the report has no clips
    pub async fn plan(&self, source: &MediaSource) -> Result<ClipReport> {
        self.execute(source, false).await
    }

    async fn execute(&self, source: &MediaSource, render: bool) -> Result<ClipReport> {
        self.config.validate()?;

        info!("🎬 Starting auto-clipper on {}", source);

        let video = self.resolve_video(source).await?;
        info!("   Video file: {}", video.display());

        let duration = self.probe_duration(&video).await?;
        let peaks = self.detect_peaks(&video).await?;
        let segments = self.build_segments(&peaks, duration)?;

        let mut report = ClipReport {
            video,
            duration,
            peaks,
            segments,
            clips: Vec::new(),
        };

        if report.segments.is_empty() {
            info!("No segments found, nothing to render");
            return Ok(report);
        }

        if render {
            report.clips = self.render_segments(&report.video, &report.segments).await?;
            info!("🎉 Done! Rendered {} clip(s)", report.clips.len());
        }

        Ok(report)
    }

    /// Step 1: local path for the source, downloading if needed
    async fn resolve_video(&self, source: &MediaSource) -> Result<PathBuf> {
        match source {
            MediaSource::Remote(url) => {
                info!("📥 Step 1: Downloading video...");
                let url = url.clone();
                self.blocking(move |backend| backend.fetch(&url)).await
            }
            MediaSource::Local(path) => {
                info!("📁 Step 1: Using local video");
                if !path.is_file() {
                    return Err(VideoError::SourceNotFound { path: path.display().to_string() }.into());
                }
                Ok(path.clone())
            }
        }
    }

    /// Step 2: total duration
    async fn probe_duration(&self, video: &Path) -> Result<f64> {
        info!("⏱️  Step 2: Getting video duration...");
        let path = video.to_path_buf();
        let duration = self.blocking(move |backend| backend.probe_duration(&path)).await?;
        info!("   Video duration: {:.2}s", duration);
        Ok(duration)
    }

    /// Step 3: decode audio and find the loudest frames
    async fn detect_peaks(&self, video: &Path) -> Result<Vec<Peak>> {
        info!("🎵 Step 3: Analyzing audio for loud moments...");
        let audio = &self.config.audio;
        let sample_rate = audio.sample_rate;

        let path = video.to_path_buf();
        let signal = self
            .blocking(move |backend| backend.decode_audio(&path, sample_rate))
            .await?;
        debug!(
            "Decoded {:.1}s of audio at {} Hz",
            signal.duration(),
            signal.sample_rate
        );

        let detector = PeakDetector::new(PeakParams {
            topk: audio.topk,
            frame_length: audio.frame_length,
            hop_length: audio.hop_length,
        });
        let peaks = detector.detect(&signal)?;

        let rounded: Vec<String> = peaks.iter().map(|p| format!("{:.2}", p.time)).collect();
        info!("   Peaks (seconds): [{}]", rounded.join(", "));
        Ok(peaks)
    }

    /// Step 4: clamp and merge windows around the peaks
    fn build_segments(&self, peaks: &[Peak], duration: f64) -> Result<Vec<Window>> {
        info!("✂️  Step 4: Building segments...");
        let segments = &self.config.segments;
        let builder = SegmentBuilder::new(segments.clip_duration, segments.merge_margin)?;
        let bounds = MediaBounds::new(duration)?;

        let times: Vec<f64> = peaks.iter().map(|peak| peak.time).collect();
        let windows = builder.build(&times, bounds)?;

        let listed: Vec<String> = windows.iter().map(Window::to_string).collect();
        info!("   Candidate segments: [{}]", listed.join(", "));
        Ok(windows)
    }

    /// Windows that will actually be rendered
    pub fn select_segments<'a>(&self, segments: &'a [Window]) -> &'a [Window] {
        match self.config.segments.max_clips {
            Some(max) => &segments[..max.min(segments.len())],
            None => segments,
        }
    }

    /// Step 5: render the selected windows in order
    async fn render_segments(&self, video: &Path, segments: &[Window]) -> Result<Vec<PathBuf>> {
        info!("🎞️  Step 5: Rendering clips...");

        let selected = self.select_segments(segments);
        let renderer = ClipRenderer::new(self.config.render.clone(), self.config.output.clips_dir.clone());
        let jobs = renderer.plan(selected, self.config.segments.clip_duration);

        let mut outputs = Vec::with_capacity(jobs.len());
        for job in jobs {
            let path = video.to_path_buf();
            let output = self.blocking(move |backend| backend.render(&path, &job)).await?;
            info!("   - {}", output.display());
            outputs.push(output);
        }

        Ok(outputs)
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MediaBackend) -> Result<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        task::spawn_blocking(move || f(backend.as_ref()))
            .await
            .map_err(|e| ClipperError::generic(format!("Background task failed: {}", e)))?
    }
}
