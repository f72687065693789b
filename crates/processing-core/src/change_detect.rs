//! Collapse validated readings into discrete score events.

use scoretrack_score_model::event::{ScoreEvent, ScoreTimeline};
use scoretrack_score_model::reading::ScoreReading;

/// Emits an event for the first reading and for every later change that is
/// an increase or a drop to zero.
///
/// Increments are measured against the immediately preceding *input*
/// reading, including readings that produced no event. This differs from
/// the validator, which compares against the last accepted reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Build the timeline for `readings`.
    ///
    /// Usually fed a [`crate::ValidatedReadings`], which dereferences to a
    /// slice. Non-zero decreases are skipped silently.
    pub fn detect(&self, readings: &[ScoreReading]) -> ScoreTimeline {
        let Some((first, rest)) = readings.split_first() else {
            return ScoreTimeline::default();
        };

        let mut events = vec![ScoreEvent::initial(first.timestamp_secs, first.score)];
        let mut previous = first.score;

        for reading in rest {
            let score = reading.score;
            if score > previous || (score < previous && score == 0) {
                let event = ScoreEvent::change(reading.timestamp_secs, score, previous);
                tracing::debug!(
                    timestamp_secs = event.timestamp_secs,
                    score,
                    increment = event.increment,
                    "Score change"
                );
                events.push(event);
            }
            previous = score;
        }

        ScoreTimeline::new(events)
    }
}
