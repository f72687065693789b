//! Rebuild a score timeline from recorded per-frame readings.

use std::path::PathBuf;

use scoretrack_common::config::AppConfig;
use scoretrack_processing_core::{load_readings, ScoreTracker, TrackerConfig};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    frames: Option<u64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let readings =
        load_readings(&path).map_err(|e| anyhow::anyhow!("Failed to load readings: {e}"))?;

    tracing::info!(path = %path.display(), readings = readings.len(), "Loaded readings");

    let tracker = ScoreTracker::new(TrackerConfig::from(&config.analysis))
        .map_err(|e| anyhow::anyhow!("Invalid analysis settings: {e}"))?;
    let frames = frames.unwrap_or(readings.len() as u64);
    let report = tracker.report(readings, frames);

    super::write_report(&report, output.as_deref())
}
