//! End-to-end score tracking over a decoded video.
//!
//! The tracker drives three collaborators that live outside this crate:
//! a [`FrameSource`] that decodes frames, a [`FramePreprocessor`] that
//! crops and normalizes the score region, and a [`Recognizer`] that turns
//! the normalized image into text candidates. Everything downstream of the
//! recognizer is deterministic.

use scoretrack_common::config::AnalysisDefaults;
use scoretrack_common::error::{ScoretrackError, ScoretrackResult};
use scoretrack_score_model::event::ScoreTimeline;
use scoretrack_score_model::reading::{
    present_readings, CandidateReading, FrameReading, ScoreReading,
};
use scoretrack_score_model::region::CropRect;
use scoretrack_score_model::report::TrackingReport;
use scoretrack_score_model::round_to;

use crate::change_detect::ChangeDetector;
use crate::extractor::{ExtractionConfig, ReadingExtractor};
use crate::pattern::analyze_pattern;
use crate::sampler::FrameSampler;
use crate::validator::SequenceValidator;

/// Progress is logged once per this many sampled frames.
const PROGRESS_EVERY: u64 = 50;

/// A decoded, sequential frame stream.
pub trait FrameSource {
    type Frame;

    /// Native frame rate, if the container reports one.
    fn frame_rate(&self) -> Option<f64>;

    /// Total frame count, if known up front.
    fn frame_count(&self) -> Option<u64> {
        None
    }

    /// The next frame in presentation order, or `None` at end of stream.
    ///
    /// Read failures mid-stream also end the stream.
    fn next_frame(&mut self) -> Option<Self::Frame>;
}

/// Crops a raw frame to the score region and normalizes it for recognition.
pub trait FramePreprocessor<F> {
    type Output;

    /// Returns `Ok(None)` when the clamped region is empty; such frames are
    /// skipped entirely.
    fn prepare(&self, frame: &F, region: &CropRect) -> ScoretrackResult<Option<Self::Output>>;
}

/// Produces text candidates for a normalized image.
///
/// Implementations are constructed once and reused for every frame of a
/// run; any model loading belongs in the constructor or [`Recognizer::warm_up`].
pub trait Recognizer<I> {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Load or check whatever the recognizer needs before the first frame.
    fn warm_up(&self) -> ScoretrackResult<()> {
        Ok(())
    }

    /// Candidates in no particular order.
    fn recognize(&self, image: &I) -> ScoretrackResult<Vec<CandidateReading>>;
}

/// Configuration for a tracking run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Frames per second selected for analysis.
    pub target_fps: f64,

    /// Candidate filtering.
    pub extraction: ExtractionConfig,

    /// Trusted score a zero must follow to count as a reset.
    pub reset_floor: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            target_fps: 5.0,
            extraction: ExtractionConfig::default(),
            reset_floor: 50,
        }
    }
}

impl From<&AnalysisDefaults> for TrackerConfig {
    fn from(defaults: &AnalysisDefaults) -> Self {
        Self {
            target_fps: defaults.target_fps,
            extraction: ExtractionConfig::from(defaults),
            reset_floor: defaults.reset_floor,
        }
    }
}

impl TrackerConfig {
    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> ScoretrackResult<()> {
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(ScoretrackError::config(format!(
                "target fps must be positive, got {}",
                self.target_fps
            )));
        }
        let confidence = self.extraction.min_confidence;
        if !(0.0..1.0).contains(&confidence) {
            return Err(ScoretrackError::config(format!(
                "min confidence must be in [0, 1), got {confidence}"
            )));
        }
        if self.extraction.min_score > self.extraction.max_score {
            return Err(ScoretrackError::config(format!(
                "score bounds are inverted: [{}, {}]",
                self.extraction.min_score, self.extraction.max_score
            )));
        }
        Ok(())
    }
}

/// Per-frame readings gathered from a source.
#[derive(Debug, Clone, Default)]
pub struct FrameReadings {
    /// Number of frames the sampler selected.
    pub frames_sampled: u64,

    /// One entry per sampled frame with a non-empty crop region, with
    /// timestamps rounded to 3 decimal places for the reading log.
    pub readings: Vec<FrameReading>,

    /// Present scores in frame order with unrounded timestamps.
    pub scores: Vec<ScoreReading>,
}

/// Runs the full reconstruction for one video at a time.
///
/// Holds no state between runs; one tracker may process many videos.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    config: TrackerConfig,
    extractor: ReadingExtractor,
    validator: SequenceValidator,
    detector: ChangeDetector,
}

impl ScoreTracker {
    /// Create a tracker, rejecting invalid configuration.
    pub fn new(config: TrackerConfig) -> ScoretrackResult<Self> {
        config.validate()?;
        Ok(Self {
            extractor: ReadingExtractor::new(config.extraction.clone()),
            validator: SequenceValidator::new(config.reset_floor),
            detector: ChangeDetector::new(),
            config,
        })
    }

    /// Create a tracker with the default scoreboard tuning.
    pub fn with_defaults() -> Self {
        let config = TrackerConfig::default();
        Self {
            extractor: ReadingExtractor::new(config.extraction.clone()),
            validator: SequenceValidator::new(config.reset_floor),
            detector: ChangeDetector::new(),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Process a whole source and build the report.
    pub fn track<S, P, R>(
        &self,
        source: &mut S,
        region: &CropRect,
        preprocessor: &P,
        recognizer: &R,
    ) -> TrackingReport
    where
        S: FrameSource,
        P: FramePreprocessor<S::Frame>,
        R: Recognizer<P::Output> + ?Sized,
    {
        let collected = self.read_frames(source, region, preprocessor, recognizer);
        let timeline = self.timeline(&collected.scores);
        let summary = analyze_pattern(&timeline);
        TrackingReport::new(timeline, summary, collected.readings, collected.frames_sampled)
    }

    /// Sample `source` and read one score (or nothing) per sampled frame.
    ///
    /// Preprocessing and recognition failures only cost the affected frame.
    pub fn read_frames<S, P, R>(
        &self,
        source: &mut S,
        region: &CropRect,
        preprocessor: &P,
        recognizer: &R,
    ) -> FrameReadings
    where
        S: FrameSource,
        P: FramePreprocessor<S::Frame>,
        R: Recognizer<P::Output> + ?Sized,
    {
        let sampler = FrameSampler::new(source.frame_rate(), self.config.target_fps);
        let expected = source.frame_count().map(|n| sampler.expected_samples(n));

        tracing::info!(
            source_fps = ?source.frame_rate(),
            target_fps = self.config.target_fps,
            interval = sampler.interval(),
            expected_samples = ?expected,
            %region,
            recognizer = recognizer.name(),
            "Reading scores from frames"
        );

        let frames = std::iter::from_fn(|| source.next_frame());
        let mut collected = FrameReadings::default();

        for (ordinal, sample) in sampler.sample(frames).enumerate() {
            let ordinal = ordinal as u64;
            collected.frames_sampled += 1;

            if ordinal % PROGRESS_EVERY == 0 {
                match expected {
                    Some(total) if total > 0 => tracing::info!(
                        "Frame {}/{} ({:.0}%)",
                        ordinal + 1,
                        total,
                        ordinal as f64 / total as f64 * 100.0
                    ),
                    _ => tracing::info!("Frame {}", ordinal + 1),
                }
            }

            let prepared = match preprocessor.prepare(&sample.image, region) {
                Ok(Some(image)) => Some(image),
                Ok(None) => {
                    tracing::debug!(frame = sample.index, "Crop region empty; skipping frame");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(frame = sample.index, error = %e, "Preprocessing failed");
                    None
                }
            };

            let score = prepared.and_then(|image| match recognizer.recognize(&image) {
                Ok(candidates) => self.extractor.extract(&candidates),
                Err(e) => {
                    tracing::warn!(frame = sample.index, error = %e, "Recognition failed");
                    None
                }
            });

            if let Some(score) = score {
                tracing::debug!(
                    frame = ordinal,
                    timestamp_secs = sample.timestamp_secs,
                    score,
                    "Read score"
                );
                collected
                    .scores
                    .push(ScoreReading::new(sample.timestamp_secs, score));
            }

            collected.readings.push(FrameReading::new(
                ordinal,
                round_to(sample.timestamp_secs, 3),
                score,
            ));
        }

        tracing::info!(
            frames = collected.frames_sampled,
            scores_read = collected.scores.len(),
            "Finished reading frames"
        );

        collected
    }

    /// Validate present readings and detect score changes.
    ///
    /// Recorded readings carry already-rounded timestamps; use
    /// [`ScoreTracker::timeline`] when the unrounded ones are at hand.
    pub fn reconstruct(&self, readings: &[FrameReading]) -> ScoreTimeline {
        self.timeline(&present_readings(readings))
    }

    /// Validate scores in frame order and detect score changes.
    pub fn timeline(&self, present: &[ScoreReading]) -> ScoreTimeline {
        let validated = self.validator.validate(present);
        let timeline = self.detector.detect(&validated);

        tracing::info!(
            readings = present.len(),
            validated = validated.len(),
            events = timeline.len(),
            total = timeline.total_score(),
            "Reconstructed score timeline"
        );

        timeline
    }

    /// Build a report from previously collected per-frame readings.
    pub fn report(&self, readings: Vec<FrameReading>, frames_processed: u64) -> TrackingReport {
        let timeline = self.reconstruct(&readings);
        let summary = analyze_pattern(&timeline);
        TrackingReport::new(timeline, summary, readings, frames_processed)
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::with_defaults()
    }
}
