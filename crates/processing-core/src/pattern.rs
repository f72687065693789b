//! Aggregate statistics over a score timeline.

use scoretrack_score_model::event::ScoreTimeline;
use scoretrack_score_model::report::ScorePattern;
use scoretrack_score_model::round_to;

/// Summarize a timeline: total, event count, mean scoring increment, and
/// the span between the first and last events.
pub fn analyze_pattern(timeline: &ScoreTimeline) -> ScorePattern {
    let (Some(first), Some(last)) = (timeline.first(), timeline.last()) else {
        return ScorePattern::empty();
    };

    let increments: Vec<i64> = timeline
        .iter()
        .map(|e| e.increment)
        .filter(|&inc| inc > 0)
        .collect();

    let avg_increment = if increments.is_empty() {
        0.0
    } else {
        increments.iter().sum::<i64>() as f64 / increments.len() as f64
    };

    ScorePattern {
        total_score: timeline.total_score(),
        score_count: timeline.len(),
        avg_score_per_change: round_to(avg_increment, 2),
        first_score_time: Some(first.timestamp_secs),
        last_score_time: Some(last.timestamp_secs),
        match_duration: round_to(last.timestamp_secs - first.timestamp_secs, 2),
    }
}
