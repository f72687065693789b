//! Plausibility filtering of raw score readings.
//!
//! Match scores are cumulative: they stay flat, grow, or reset to zero
//! between periods. A single left-to-right pass keeps the first reading as
//! the anchor and then accepts a reading only when, compared with the last
//! *accepted* reading, it does not decrease or it is a reset (a zero after
//! a score above the reset floor). Rejected readings never become the
//! anchor, so an isolated low misread cannot drag the trusted score down.

use std::ops::Deref;

use scoretrack_score_model::reading::ScoreReading;

/// Readings that satisfy the monotonic-or-reset rule, in input order.
///
/// Only [`SequenceValidator::validate`] constructs this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedReadings(Vec<ScoreReading>);

impl ValidatedReadings {
    pub fn into_inner(self) -> Vec<ScoreReading> {
        self.0
    }
}

impl Deref for ValidatedReadings {
    type Target = [ScoreReading];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Single-pass monotonic-or-reset filter.
#[derive(Debug, Clone, Copy)]
pub struct SequenceValidator {
    reset_floor: u32,
}

impl SequenceValidator {
    /// A drop to zero is accepted only from a trusted score above `reset_floor`.
    pub fn new(reset_floor: u32) -> Self {
        Self { reset_floor }
    }

    pub fn reset_floor(&self) -> u32 {
        self.reset_floor
    }

    /// Whether `score` may follow the trusted score `anchor`.
    pub fn accepts(&self, anchor: u32, score: u32) -> bool {
        score >= anchor || (anchor > self.reset_floor && score == 0)
    }

    /// Filter `readings`, which must be in non-decreasing timestamp order.
    pub fn validate(&self, readings: &[ScoreReading]) -> ValidatedReadings {
        let Some((first, rest)) = readings.split_first() else {
            return ValidatedReadings::default();
        };

        let mut retained = Vec::with_capacity(readings.len());
        retained.push(*first);
        let mut anchor = first.score;

        for reading in rest {
            if self.accepts(anchor, reading.score) {
                if reading.score < anchor {
                    tracing::debug!(
                        timestamp_secs = reading.timestamp_secs,
                        from = anchor,
                        "Accepted score reset"
                    );
                }
                anchor = reading.score;
                retained.push(*reading);
            } else {
                tracing::debug!(
                    timestamp_secs = reading.timestamp_secs,
                    score = reading.score,
                    anchor,
                    "Rejected implausible reading"
                );
            }
        }

        ValidatedReadings(retained)
    }
}

impl Default for SequenceValidator {
    fn default() -> Self {
        Self::new(50)
    }
}
