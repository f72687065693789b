//! Full tracking runs over synthetic scoreboard frames.
//!
//! Each frame draws the score as a bright bar whose length in pixels is the
//! score; a bar filling the whole region stands for an unreadable frame.
//! The bar-counting recognizer reads the length back from the normalized
//! crop, so cropping, binarization, and the tracker run together.

use std::collections::VecDeque;

use image::{GrayImage, Rgb, RgbImage};
use scoretrack_common::error::{ScoretrackError, ScoretrackResult};
use scoretrack_ocr_engine::ScoreboardPreprocessor;
use scoretrack_processing_core::{FrameSource, Recognizer, ScoreTracker};
use scoretrack_score_model::reading::CandidateReading;
use scoretrack_score_model::region::CropRect;
use scoretrack_score_model::report::TrackingOutcome;

const REGION: CropRect = CropRect {
    x: 20,
    y: 10,
    width: 120,
    height: 4,
};

struct SyntheticMatch {
    fps: f64,
    frames: VecDeque<Option<u32>>,
}

impl SyntheticMatch {
    /// `None` fills the scoreboard with a full-width bar.
    fn new(fps: f64, scores: &[Option<u32>]) -> Self {
        Self {
            fps,
            frames: scores.iter().copied().collect(),
        }
    }
}

impl FrameSource for SyntheticMatch {
    type Frame = RgbImage;

    fn frame_rate(&self) -> Option<f64> {
        Some(self.fps)
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.frames.len() as u64)
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        let score = self.frames.pop_front()?;
        let bar = score.unwrap_or(u32::MAX);
        Some(RgbImage::from_fn(160, 24, |x, y| {
            let in_region = (20..140).contains(&x) && (10..14).contains(&y);
            if in_region && x - 20 < bar {
                Rgb([250, 250, 250])
            } else {
                Rgb([15, 15, 60])
            }
        }))
    }
}

/// Reads the length of the dark bar in the first row; a saturated row is
/// reported with low confidence.
struct BarCounter;

impl Recognizer<GrayImage> for BarCounter {
    fn name(&self) -> &str {
        "bar-counter"
    }

    fn recognize(&self, image: &GrayImage) -> ScoretrackResult<Vec<CandidateReading>> {
        if image.width() == 0 {
            return Err(ScoretrackError::recognition("empty crop"));
        }
        let dark = (0..image.width())
            .filter(|&x| image.get_pixel(x, 0)[0] < 128)
            .count();
        let confidence = if dark == image.width() as usize { 0.1 } else { 0.9 };
        Ok(vec![CandidateReading::new(dark.to_string(), confidence)])
    }
}

#[test]
fn tracks_scores_drawn_on_frames() {
    let scores = [
        Some(0),
        Some(0),
        Some(3),
        Some(3),
        Some(8),
        None,
        Some(2),
        Some(8),
        Some(15),
        Some(60),
        Some(60),
        Some(0),
        Some(4),
    ];
    let mut source = SyntheticMatch::new(5.0, &scores);
    let preprocessor = ScoreboardPreprocessor::new(127, 1, 0.0);

    let report =
        ScoreTracker::with_defaults().track(&mut source, &REGION, &preprocessor, &BarCounter);

    assert_eq!(report.outcome, TrackingOutcome::Timeline);
    assert_eq!(report.frames_processed, 13);
    assert_eq!(report.scores_read, 12);
    assert_eq!(report.readings[5].score, None);

    let events: Vec<(f64, u32, i64)> = report
        .score_timeline
        .iter()
        .map(|e| (e.timestamp_secs, e.score, e.increment))
        .collect();
    assert_eq!(
        events,
        vec![
            (0.0, 0, 0),
            (0.4, 3, 3),
            (0.8, 8, 5),
            (1.6, 15, 7),
            (1.8, 60, 45),
            (2.2, 0, -60),
            (2.4, 4, 4)
        ]
    );
    assert_eq!(report.total_score, 4);
}

#[test]
fn tracks_with_upscaled_crops() {
    let scores = [Some(5), Some(5), Some(9), Some(12)];
    let mut source = SyntheticMatch::new(5.0, &scores);
    let preprocessor = ScoreboardPreprocessor::new(127, 2, 0.0);

    let report =
        ScoreTracker::with_defaults().track(&mut source, &REGION, &preprocessor, &BarCounter);

    // Bars double in length after upscaling.
    let scores: Vec<u32> = report.score_timeline.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![10, 18, 24]);
}

#[test]
fn region_outside_frame_reads_nothing() {
    let mut source = SyntheticMatch::new(5.0, &[Some(10), Some(20)]);
    let region = CropRect::new(-500, -500, 10, 10);

    let report = ScoreTracker::with_defaults().track(
        &mut source,
        &region,
        &ScoreboardPreprocessor::default(),
        &BarCounter,
    );

    assert_eq!(report.frames_processed, 2);
    assert!(report.readings.is_empty());
    assert_eq!(report.outcome, TrackingOutcome::NothingRecognized);
}
