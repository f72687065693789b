//! Track the score shown in a video.

use std::path::PathBuf;

use scoretrack_common::config::AppConfig;
use scoretrack_ocr_engine::{build_recognizer, RecognizerKind, ScoreboardPreprocessor};
use scoretrack_processing_core::{ScoreTracker, TrackerConfig};
use scoretrack_score_model::reading::serialize_readings;
use scoretrack_score_model::region::CropRect;
use scoretrack_score_model::report::TrackingOutcome;
use scoretrack_video_source::FfmpegSource;

pub struct ProcessOptions {
    pub video: PathBuf,
    pub crop: CropRect,
    pub fps: Option<f64>,
    pub alliance: Option<String>,
    pub recognizer: RecognizerKind,
    pub output: Option<PathBuf>,
    pub readings: Option<PathBuf>,
}

pub fn run(config: &AppConfig, options: ProcessOptions) -> anyhow::Result<()> {
    let mut analysis = config.analysis.clone();
    if let Some(fps) = options.fps {
        analysis.target_fps = fps;
    }

    let tracker = ScoreTracker::new(TrackerConfig::from(&analysis))
        .map_err(|e| anyhow::anyhow!("Invalid analysis settings: {e}"))?;
    let preprocessor = ScoreboardPreprocessor::from(&config.preprocess);
    let recognizer = build_recognizer(&options.recognizer)
        .map_err(|e| anyhow::anyhow!("Failed to set up recognizer: {e}"))?;

    if let Err(e) = recognizer.warm_up() {
        tracing::warn!(
            recognizer = recognizer.name(),
            error = %e,
            "Recognizer warm-up failed; frames will retry"
        );
    }

    let mut source = FfmpegSource::open(&options.video)
        .map_err(|e| anyhow::anyhow!("Failed to open video: {e}"))?;

    tracing::info!(
        video = %options.video.display(),
        crop = %options.crop,
        alliance = options.alliance.as_deref().unwrap_or("-"),
        "Processing video"
    );

    let mut report = tracker.track(
        &mut source,
        &options.crop,
        &preprocessor,
        recognizer.as_ref(),
    );
    if let Some(alliance) = options.alliance {
        report = report.with_alliance(alliance);
    }

    if report.outcome == TrackingOutcome::NoFrames {
        anyhow::bail!("Could not extract frames from video");
    }
    if report.outcome == TrackingOutcome::NothingRecognized {
        tracing::warn!("No score was recognized; check the crop rectangle");
    }

    if let Some(path) = &options.readings {
        let jsonl = serialize_readings(&report.readings)
            .map_err(|e| anyhow::anyhow!("Failed to serialize readings: {e}"))?;
        std::fs::write(path, jsonl)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote per-frame readings");
    }

    super::write_report(&report, options.output.as_deref())
}
