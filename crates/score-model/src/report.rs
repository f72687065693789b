//! Summaries and the serialized report for one processed video.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::ScoreTimeline;
use crate::reading::{FrameReading, TimestampSecs};

/// Aggregate statistics over a score timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePattern {
    /// Last event's score, or 0.
    pub total_score: u32,

    /// Number of events in the timeline, the initial event included.
    pub score_count: usize,

    /// Mean of the positive increments, rounded to 2 places.
    pub avg_score_per_change: f64,

    pub first_score_time: Option<TimestampSecs>,

    pub last_score_time: Option<TimestampSecs>,

    /// `last_score_time - first_score_time`, rounded to 2 places.
    ///
    /// Computed whenever the timeline has events, including when the first
    /// event is at 0.0s; a zero start time is not treated as unset.
    pub match_duration: f64,
}

impl ScorePattern {
    /// The pattern of a timeline with no events.
    pub fn empty() -> Self {
        Self {
            total_score: 0,
            score_count: 0,
            avg_score_per_change: 0.0,
            first_score_time: None,
            last_score_time: None,
            match_duration: 0.0,
        }
    }
}

/// How a processing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingOutcome {
    /// The source opened but yielded no sampled frames.
    NoFrames,
    /// Frames were sampled but no score was recognized in any of them.
    NothingRecognized,
    /// At least one score was read.
    Timeline,
}

/// Full result of processing one video.
///
/// Field names follow the camelCase JSON shape consumed by the scouting UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingReport {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance: Option<String>,

    pub outcome: TrackingOutcome,

    pub score_timeline: ScoreTimeline,

    pub total_score: u32,

    /// Number of sampled frames.
    pub frames_processed: u64,

    /// Number of sampled frames with a recognized score.
    pub scores_read: u64,

    pub summary: ScorePattern,

    #[serde(default)]
    pub readings: Vec<FrameReading>,

    pub generated_at: DateTime<Utc>,
}

impl TrackingReport {
    /// Assemble a report, stamping it with the current time.
    pub fn new(
        timeline: ScoreTimeline,
        summary: ScorePattern,
        readings: Vec<FrameReading>,
        frames_processed: u64,
    ) -> Self {
        let scores_read = readings.iter().filter(|r| r.score.is_some()).count() as u64;
        let outcome = if frames_processed == 0 {
            TrackingOutcome::NoFrames
        } else if scores_read == 0 {
            TrackingOutcome::NothingRecognized
        } else {
            TrackingOutcome::Timeline
        };

        Self {
            success: outcome != TrackingOutcome::NoFrames,
            alliance: None,
            outcome,
            total_score: timeline.total_score(),
            score_timeline: timeline,
            frames_processed,
            scores_read,
            summary,
            readings,
            generated_at: Utc::now(),
        }
    }

    /// Label the report with the alliance colour it was recorded for.
    pub fn with_alliance(mut self, alliance: impl Into<String>) -> Self {
        self.alliance = Some(alliance.into());
        self
    }
}
