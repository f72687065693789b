//! ScoreTrack OCR Engine
//!
//! Turns decoded frames into recognizer candidates:
//! - **Preprocess:** Crop the score region and normalize it for recognition
//! - **Tesseract:** Digit recognition through the `tesseract` CLI
//! - **Command:** Any external program that prints JSON candidates

pub mod command;
pub mod preprocess;
pub mod tesseract;

use image::GrayImage;
use scoretrack_common::error::ScoretrackResult;
use scoretrack_processing_core::Recognizer;

pub use command::CommandRecognizer;
pub use preprocess::{binarize_inverted, crop_region, ScoreboardPreprocessor};
pub use tesseract::TesseractRecognizer;

/// Which recognizer backend to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerKind {
    Tesseract,
    /// External program given as a whitespace-separated command line,
    /// followed by extra arguments passed through verbatim.
    Command {
        command_line: String,
        extra_args: Vec<String>,
    },
}

/// Build the recognizer for `kind`.
pub fn build_recognizer(kind: &RecognizerKind) -> ScoretrackResult<Box<dyn Recognizer<GrayImage>>> {
    Ok(match kind {
        RecognizerKind::Tesseract => Box::new(TesseractRecognizer::new()),
        RecognizerKind::Command {
            command_line,
            extra_args,
        } => Box::new(CommandRecognizer::parse(command_line)?.with_args(extra_args.iter().cloned())),
    })
}
