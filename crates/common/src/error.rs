//! Error types shared across ScoreTrack crates.

use std::path::PathBuf;

/// Top-level error type for ScoreTrack operations.
#[derive(Debug, thiserror::Error)]
pub enum ScoretrackError {
    /// The video source could not be opened or probed at all.
    #[error("Could not read source: {message}")]
    SourceUnavailable { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Preprocess error: {message}")]
    Preprocess { message: String },

    #[error("Recognition error: {message}")]
    Recognition { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using ScoretrackError.
pub type ScoretrackResult<T> = Result<T, ScoretrackError>;

impl ScoretrackError {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn preprocess(msg: impl Into<String>) -> Self {
        Self::Preprocess {
            message: msg.into(),
        }
    }

    pub fn recognition(msg: impl Into<String>) -> Self {
        Self::Recognition {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
