//! Loading recorded per-frame readings for offline reconstruction.

use std::io::ErrorKind;
use std::path::Path;

use scoretrack_common::error::{ScoretrackError, ScoretrackResult};
use scoretrack_score_model::reading::{parse_readings, FrameReading};

/// Read a readings JSONL file written by a previous tracking run.
pub fn load_readings(path: &Path) -> ScoretrackResult<Vec<FrameReading>> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScoretrackError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ScoretrackError::Io(e),
    })?;

    let readings = parse_readings(&content).map_err(|e| {
        ScoretrackError::invalid_input(format!("{} is not a readings file: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), readings = readings.len(), "Loaded readings");
    Ok(readings)
}
