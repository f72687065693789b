use proptest::prelude::*;

use scoretrack_processing_core::{ChangeDetector, ReadingExtractor, SequenceValidator};
use scoretrack_score_model::reading::{CandidateReading, ScoreReading};

fn readings_from(scores: &[u32]) -> Vec<ScoreReading> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &s)| ScoreReading::new(i as f64 * 0.2, s))
        .collect()
}

fn score_sequence() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(prop_oneof![Just(0u32), 0u32..200], 0..60)
}

proptest! {
    #[test]
    fn validate_is_idempotent(scores in score_sequence()) {
        let validator = SequenceValidator::default();
        let once = validator.validate(&readings_from(&scores));
        let twice = validator.validate(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn validated_steps_are_monotone_or_reset(scores in score_sequence()) {
        let validator = SequenceValidator::default();
        let validated = validator.validate(&readings_from(&scores));

        for pair in validated.windows(2) {
            let (prev, next) = (pair[0].score, pair[1].score);
            prop_assert!(next >= prev || (prev > validator.reset_floor() && next == 0));
        }
    }

    #[test]
    fn validated_timeline_ends_on_last_trusted_score(scores in score_sequence()) {
        let validated = SequenceValidator::default().validate(&readings_from(&scores));
        let timeline = ChangeDetector::new().detect(&validated);

        let expected = validated.last().map_or(0, |r| r.score);
        prop_assert_eq!(timeline.total_score(), expected);
    }

    #[test]
    fn timeline_events_rise_or_reset_to_zero(scores in score_sequence()) {
        let validated = SequenceValidator::default().validate(&readings_from(&scores));
        let timeline = ChangeDetector::new().detect(&validated);

        for pair in timeline.events.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            prop_assert!(
                next.score > prev.score || (next.score == 0 && prev.score > 0 && next.is_reset())
            );
            prop_assert_eq!(next.increment, i64::from(next.score) - i64::from(prev.score));
            prop_assert!(next.timestamp_secs >= prev.timestamp_secs);
        }
    }

    #[test]
    fn monotone_input_yields_one_event_per_distinct_value(
        mut scores in prop::collection::vec(0u32..1000, 1..60)
    ) {
        scores.sort_unstable();
        let timeline = ChangeDetector::new().detect(&readings_from(&scores));

        let mut distinct = scores.clone();
        distinct.dedup();
        let emitted: Vec<u32> = timeline.iter().map(|e| e.score).collect();
        prop_assert_eq!(emitted, distinct);
    }

    #[test]
    fn extracted_score_is_in_bounds_and_confident(
        raw in prop::collection::vec(("[0-9a-z:]{0,5}", 0.0f64..1.0), 0..8)
    ) {
        let candidates: Vec<CandidateReading> = raw
            .into_iter()
            .map(|(text, confidence)| CandidateReading::new(text, confidence))
            .collect();

        let extractor = ReadingExtractor::default();
        if let Some((score, confidence)) = extractor.extract_with_confidence(&candidates) {
            prop_assert!(score <= 999);
            prop_assert!(confidence > 0.3);
            prop_assert!(candidates
                .iter()
                .all(|c| c.confidence <= confidence || c.numeric_value().map_or(true, |v| v > 999)));
        }
    }
}
