//! Reading arbitration: many recognizer candidates in, one score out.

use scoretrack_common::config::AnalysisDefaults;
use scoretrack_score_model::reading::CandidateReading;

/// Filters applied to recognizer candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Candidates with confidence at or below this are discarded.
    pub min_confidence: f64,

    /// Smallest plausible score (inclusive).
    pub min_score: u32,

    /// Largest plausible score (inclusive).
    pub max_score: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            min_score: 0,
            max_score: 999,
        }
    }
}

impl From<&AnalysisDefaults> for ExtractionConfig {
    fn from(defaults: &AnalysisDefaults) -> Self {
        Self {
            min_confidence: defaults.min_confidence,
            min_score: defaults.min_score,
            max_score: defaults.max_score,
        }
    }
}

/// Picks the single most confident plausible score among candidates.
#[derive(Debug, Clone, Default)]
pub struct ReadingExtractor {
    config: ExtractionConfig,
}

impl ReadingExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Best score among `candidates`, or `None` if none survives filtering.
    pub fn extract(&self, candidates: &[CandidateReading]) -> Option<u32> {
        self.extract_with_confidence(candidates).map(|(score, _)| score)
    }

    /// Best score among `candidates` together with its confidence.
    ///
    /// A candidate survives when its text holds digits, its confidence is
    /// strictly above the minimum, and its value lies within the score
    /// bounds. Among survivors the strictly highest confidence wins, so the
    /// first of several equally confident candidates is kept.
    pub fn extract_with_confidence(&self, candidates: &[CandidateReading]) -> Option<(u32, f64)> {
        let mut best: Option<(u32, f64)> = None;

        for candidate in candidates {
            let Some(value) = candidate.numeric_value() else {
                continue;
            };

            // NaN confidences fail this comparison and are dropped.
            let confident = candidate.confidence > self.config.min_confidence;
            if !confident {
                continue;
            }

            let in_bounds = value >= u64::from(self.config.min_score)
                && value <= u64::from(self.config.max_score);
            if !in_bounds {
                continue;
            }

            if best.map_or(true, |(_, confidence)| candidate.confidence > confidence) {
                best = Some((value as u32, candidate.confidence));
            }
        }

        if let Some((score, confidence)) = best {
            tracing::trace!(score, confidence, "Selected candidate");
        }

        best
    }
}
