//! Score change events and the timeline they form.

use serde::{Deserialize, Serialize};

use crate::reading::TimestampSecs;

/// A discrete, timestamped change in the running score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Seconds since video start, rounded to 2 decimal places.
    #[serde(rename = "timestamp")]
    pub timestamp_secs: TimestampSecs,

    /// Score after the change.
    pub score: u32,

    /// Difference from the previous reading. Zero for the first event,
    /// negative only for a reset to zero.
    pub increment: i64,
}

impl ScoreEvent {
    /// The first observed score of a timeline.
    pub fn initial(timestamp_secs: TimestampSecs, score: u32) -> Self {
        Self {
            timestamp_secs: crate::round_to(timestamp_secs, 2),
            score,
            increment: 0,
        }
    }

    /// A change from `previous` to `score`.
    pub fn change(timestamp_secs: TimestampSecs, score: u32, previous: u32) -> Self {
        Self {
            timestamp_secs: crate::round_to(timestamp_secs, 2),
            score,
            increment: i64::from(score) - i64::from(previous),
        }
    }

    /// Whether this event records a drop to zero.
    pub fn is_reset(&self) -> bool {
        self.score == 0 && self.increment < 0
    }
}

/// Ordered sequence of score events for one video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTimeline {
    pub events: Vec<ScoreEvent>,
}

impl ScoreTimeline {
    pub fn new(events: Vec<ScoreEvent>) -> Self {
        Self { events }
    }

    /// The reported total: the last event's score, or 0 when empty.
    pub fn total_score(&self) -> u32 {
        self.events.last().map(|e| e.score).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreEvent> {
        self.events.iter()
    }

    pub fn first(&self) -> Option<&ScoreEvent> {
        self.events.first()
    }

    pub fn last(&self) -> Option<&ScoreEvent> {
        self.events.last()
    }
}

impl<'a> IntoIterator for &'a ScoreTimeline {
    type Item = &'a ScoreEvent;
    type IntoIter = std::slice::Iter<'a, ScoreEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
