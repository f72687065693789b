//! Write the normalized score crop of a still frame.
//!
//! Useful for calibrating the crop rectangle before processing a video.

use std::path::PathBuf;

use scoretrack_common::config::AppConfig;
use scoretrack_ocr_engine::ScoreboardPreprocessor;
use scoretrack_processing_core::FramePreprocessor;
use scoretrack_score_model::region::CropRect;

pub fn run(
    config: &AppConfig,
    image: PathBuf,
    crop: CropRect,
    output: PathBuf,
) -> anyhow::Result<()> {
    let frame = image::open(&image)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", image.display()))?
        .to_rgb8();
    let (width, height) = frame.dimensions();

    let preprocessor = ScoreboardPreprocessor::from(&config.preprocess);
    let normalized = preprocessor
        .prepare(&frame, &crop)
        .map_err(|e| anyhow::anyhow!("Failed to preprocess: {e}"))?
        .ok_or_else(|| {
            anyhow::anyhow!("Crop {crop} lies outside the {width}x{height} image")
        })?;

    normalized
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!(
        "Wrote {}x{} crop to {}",
        normalized.width(),
        normalized.height(),
        output.display()
    );
    Ok(())
}
