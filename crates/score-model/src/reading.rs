//! Recognizer candidates and per-frame score readings.
//!
//! Per-frame readings are stored as JSONL (one object per line) so a
//! recorded run can be replayed through the validator and change detector
//! without touching the video again.

use serde::{Deserialize, Serialize};

/// Seconds since the start of the source video.
pub type TimestampSecs = f64;

/// One `(text, confidence)` pair produced by a recognizer for a cropped frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReading {
    /// Raw recognized text, possibly with stray punctuation.
    pub text: String,

    /// Recognizer confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl CandidateReading {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    /// The ASCII digits of the text, in order, with everything else removed.
    pub fn digits(&self) -> String {
        self.text.chars().filter(char::is_ascii_digit).collect()
    }

    /// Parse the digit string as a non-negative integer.
    ///
    /// Returns `None` when the text holds no digits or the value does not
    /// fit in a `u64`.
    pub fn numeric_value(&self) -> Option<u64> {
        let digits = self.digits();
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }
}

/// A score that was read at a known time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreReading {
    #[serde(rename = "timestamp")]
    pub timestamp_secs: TimestampSecs,
    pub score: u32,
}

impl ScoreReading {
    pub fn new(timestamp_secs: TimestampSecs, score: u32) -> Self {
        Self {
            timestamp_secs,
            score,
        }
    }
}

/// The outcome for one sampled frame: the best score, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameReading {
    /// Ordinal of the frame among the sampled frames.
    #[serde(default)]
    pub frame: u64,

    #[serde(rename = "timestamp")]
    pub timestamp_secs: TimestampSecs,

    /// Absent when no candidate survived arbitration.
    pub score: Option<u32>,
}

impl FrameReading {
    pub fn new(frame: u64, timestamp_secs: TimestampSecs, score: Option<u32>) -> Self {
        Self {
            frame,
            timestamp_secs,
            score,
        }
    }

    /// The score reading for this frame, if one was recognized.
    pub fn score_reading(&self) -> Option<ScoreReading> {
        self.score.map(|score| ScoreReading::new(self.timestamp_secs, score))
    }
}

/// Keep only frames with a recognized score, preserving order.
pub fn present_readings(frames: &[FrameReading]) -> Vec<ScoreReading> {
    frames.iter().filter_map(FrameReading::score_reading).collect()
}

/// Parse frame readings from JSONL content (one JSON object per line).
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_readings(jsonl: &str) -> Result<Vec<FrameReading>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize frame readings to JSONL format.
pub fn serialize_readings(readings: &[FrameReading]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for reading in readings {
        output.push_str(&serde_json::to_string(reading)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_strip_punctuation() {
        let candidate = CandidateReading::new(" 1,2.3 ", 0.9);
        assert_eq!(candidate.digits(), "123");
        assert_eq!(candidate.numeric_value(), Some(123));
    }

    #[test]
    fn test_numeric_value_absent_without_digits() {
        assert_eq!(CandidateReading::new("abc", 0.9).numeric_value(), None);
        assert_eq!(CandidateReading::new("", 0.9).numeric_value(), None);
    }

    #[test]
    fn test_numeric_value_keeps_leading_zeros_meaningless() {
        assert_eq!(CandidateReading::new("007", 0.9).numeric_value(), Some(7));
    }

    #[test]
    fn test_numeric_value_overflow_is_absent() {
        let candidate = CandidateReading::new("99999999999999999999999", 0.9);
        assert_eq!(candidate.numeric_value(), None);
    }

    #[test]
    fn test_present_readings_drops_absent_frames() {
        let frames = vec![
            FrameReading::new(0, 0.0, Some(4)),
            FrameReading::new(1, 0.2, None),
            FrameReading::new(2, 0.4, Some(6)),
        ];
        let present = present_readings(&frames);
        assert_eq!(
            present,
            vec![ScoreReading::new(0.0, 4), ScoreReading::new(0.4, 6)]
        );
    }

    #[test]
    fn test_parse_readings_accepts_null_and_missing_fields() {
        let jsonl = "# recorded run\n\
            {\"frame\":0,\"timestamp\":0.0,\"score\":12}\n\
            \n\
            {\"frame\":1,\"timestamp\":0.2,\"score\":null}\n\
            {\"timestamp\":0.4}\n";
        let parsed = parse_readings(jsonl).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].score, Some(12));
        assert_eq!(parsed[1].score, None);
        assert_eq!(parsed[2].frame, 0);
        assert_eq!(parsed[2].score, None);
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let readings = vec![
            FrameReading::new(0, 0.0, Some(0)),
            FrameReading::new(1, 0.2, None),
        ];
        let jsonl = serialize_readings(&readings).unwrap();
        assert_eq!(parse_readings(&jsonl).unwrap(), readings);
    }

    #[test]
    fn test_parse_readings_rejects_garbage() {
        assert!(parse_readings("{\"timestamp\": \"soon\"}").is_err());
    }
}
