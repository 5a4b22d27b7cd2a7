use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use auto_clipper::{config::Config, ClipPipeline, ClipReport, MediaSource};

#[derive(Parser, Debug)]
#[command(
    name = "auto-clipper",
    version,
    about = "Cut short vertical clips from the loudest moments of a video",
    long_about = "Auto-Clipper downloads (or takes) a video, finds its loudest moments from the audio track, and renders 9:16 clips centred on them with ffmpeg."
)]
struct Cli {
    /// Video URL or local file path
    source: String,

    /// Clip length in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Number of loud moments to look for
    #[arg(long)]
    topk: Option<usize>,

    /// Maximum number of clips to render
    #[arg(long, conflicts_with = "all_clips")]
    max_clips: Option<usize>,

    /// Render every merged segment
    #[arg(long)]
    all_clips: bool,

    /// Analysis sample rate in Hz
    #[arg(long)]
    sr: Option<u32>,

    /// Samples per analysis frame
    #[arg(long)]
    frame_length: Option<usize>,

    /// Samples between analysis frames
    #[arg(long)]
    hop_length: Option<usize>,

    /// Merge windows closer than this many seconds
    #[arg(long)]
    merge_margin: Option<f64>,

    /// Directory for rendered clips
    #[arg(long)]
    clips_dir: Option<PathBuf>,

    /// Directory for downloaded videos
    #[arg(long)]
    downloads_dir: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analyse and print the plan without rendering
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command line overrides on top of `config`
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(duration) = self.duration {
            config.segments.clip_duration = duration;
        }
        if let Some(topk) = self.topk {
            config.audio.topk = topk;
        }
        if let Some(max_clips) = self.max_clips {
            config.segments.max_clips = Some(max_clips);
        }
        if self.all_clips {
            config.segments.max_clips = None;
        }
        if let Some(sr) = self.sr {
            config.audio.sample_rate = sr;
        }
        if let Some(frame_length) = self.frame_length {
            config.audio.frame_length = frame_length;
        }
        if let Some(hop_length) = self.hop_length {
            config.audio.hop_length = hop_length;
        }
        if let Some(merge_margin) = self.merge_margin {
            config.segments.merge_margin = merge_margin;
        }
        if let Some(dir) = &self.clips_dir {
            config.output.clips_dir = dir.clone();
        }
        if let Some(dir) = &self.downloads_dir {
            config.output.downloads_dir = dir.clone();
        }
    }

    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => {
                info!("Loading configuration from {:?}", config_path);
                Config::from_file(config_path)?
            }
            None => {
                info!("Using default configuration");
                Config::default()
            }
        };

        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_report(report: &ClipReport, dry_run: bool) {
    let peaks: Vec<String> = report.peaks.iter().map(|p| format!("{:.2}", p.time)).collect();
    println!("Peaks (seconds): [{}]", peaks.join(", "));

    let segments: Vec<String> = report.segments.iter().map(|w| w.to_string()).collect();
    println!("Candidate segments: [{}]", segments.join(", "));

    if report.segments.is_empty() {
        println!("No segments found.");
    } else if dry_run {
        println!("Dry run: no clips rendered.");
    } else {
        println!("Rendered clips:");
        for clip in &report.clips {
            println!("  - {}", clip.display());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("Starting Auto-Clipper v{}", env!("CARGO_PKG_VERSION"));

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    let source = MediaSource::parse(&cli.source);
    let pipeline = ClipPipeline::new(config);

    let result = if cli.dry_run {
        pipeline.plan(&source).await
    } else {
        pipeline.run(&source).await
    };

    match result {
        Ok(report) => {
            print_report(&report, cli.dry_run);
            Ok(())
        }
        Err(e) => {
            error!("{}", e.user_message());
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "auto-clipper",
            "https://youtu.be/abc",
            "--duration",
            "30",
            "--topk",
            "10",
            "--max-clips",
            "5",
            "--merge-margin",
            "2.5",
            "--clips-dir",
            "out",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.segments.clip_duration, 30.0);
        assert_eq!(config.audio.topk, 10);
        assert_eq!(config.segments.max_clips, Some(5));
        assert_eq!(config.segments.merge_margin, 2.5);
        assert_eq!(config.output.clips_dir, PathBuf::from("out"));
        assert_eq!(config.audio.sample_rate, 22050);
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let cli = Cli::try_parse_from(["auto-clipper", "talk.mp4"]).unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config, Config::default());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_all_clips_removes_limit() {
        let cli = Cli::try_parse_from(["auto-clipper", "talk.mp4", "--all-clips"]).unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.segments.max_clips, None);
    }

    #[test]
    fn test_all_clips_conflicts_with_max_clips() {
        let result = Cli::try_parse_from(["auto-clipper", "talk.mp4", "--all-clips", "--max-clips", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_is_required() {
        assert!(Cli::try_parse_from(["auto-clipper"]).is_err());
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let cli = Cli::try_parse_from(["auto-clipper", "talk.mp4", "--hop-length", "0"]).unwrap();
        assert!(cli.load_config().is_err());
    }
}
