//! Recognition delegated to an arbitrary external program.
//!
//! The program is invoked once per crop with the path of a PNG image as its
//! last argument and must print candidates on stdout, either as a JSON
//! array or as one JSON object per line:
//!
//! ```text
//! {"text": "42", "confidence": 0.93}
//! ```

use std::process::Command;

use image::GrayImage;
use scoretrack_common::error::{ScoretrackError, ScoretrackResult};
use scoretrack_common::tools::command_exists;
use scoretrack_processing_core::Recognizer;
use scoretrack_score_model::reading::CandidateReading;
use tempfile::NamedTempFile;

/// Wraps an external recognizer program.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace into program and arguments.
    ///
    /// Quotes are not interpreted, so an argument containing spaces must be
    /// added with [`CommandRecognizer::with_args`] instead.
    pub fn parse(command_line: &str) -> ScoretrackResult<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ScoretrackError::config("Recognizer command is empty"))?;
        Ok(Self::new(program, parts))
    }

    /// Append arguments verbatim, after those already given.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Recognizer<GrayImage> for CommandRecognizer {
    fn name(&self) -> &str {
        &self.program
    }

    fn warm_up(&self) -> ScoretrackResult<()> {
        if command_exists(&self.program) {
            tracing::info!(program = %self.program, "Recognizer command ready");
            Ok(())
        } else {
            Err(ScoretrackError::recognition(format!(
                "{} is not installed or not on PATH",
                self.program
            )))
        }
    }

    fn recognize(&self, image: &GrayImage) -> ScoretrackResult<Vec<CandidateReading>> {
        let input = NamedTempFile::with_suffix(".png")?;
        image
            .save(input.path())
            .map_err(|e| ScoretrackError::recognition(format!("Failed to write crop: {e}")))?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(input.path())
            .output()
            .map_err(|e| {
                ScoretrackError::recognition(format!("Failed to run {}: {e}", self.program))
            })?;

        if !output.status.success() {
            return Err(ScoretrackError::recognition(format!(
                "{} failed (status {}): {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_candidates(&String::from_utf8_lossy(&output.stdout)).map_err(|e| {
            ScoretrackError::recognition(format!("{} printed invalid output: {e}", self.program))
        })
    }
}

/// Parse candidates printed as a JSON array or as JSON lines.
pub fn parse_candidates(output: &str) -> Result<Vec<CandidateReading>, serde_json::Error> {
    let trimmed = output.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed);
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidates_json_lines() {
        let out = "{\"text\":\"12\",\"confidence\":0.8}\n\n{\"text\":\"17\",\"confidence\":0.4}\n";
        let candidates = parse_candidates(out).unwrap();
        assert_eq!(
            candidates,
            vec![
                CandidateReading::new("12", 0.8),
                CandidateReading::new("17", 0.4)
            ]
        );
    }

    #[test]
    fn test_parse_candidates_array_and_empty() {
        let candidates = parse_candidates(" [{\"text\":\"5\",\"confidence\":0.99}] ").unwrap();
        assert_eq!(candidates, vec![CandidateReading::new("5", 0.99)]);
        assert!(parse_candidates("").unwrap().is_empty());
        assert!(parse_candidates("not json").is_err());
    }

    #[test]
    fn test_parse_command_line() {
        let recognizer = CommandRecognizer::parse("python3 ocr.py --digits").unwrap();
        assert_eq!(recognizer.program(), "python3");
        assert_eq!(recognizer.args, vec!["ocr.py", "--digits"]);
        assert!(CommandRecognizer::parse("   ").is_err());
    }

    #[test]
    fn test_extra_args_keep_spaces() {
        let recognizer = CommandRecognizer::parse("python3")
            .unwrap()
            .with_args(["/opt/score models/ocr.py", "--digits"]);
        assert_eq!(recognizer.args, vec!["/opt/score models/ocr.py", "--digits"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_spaced_argument_reaches_program_intact() {
        let recognizer = CommandRecognizer::parse("sh -c")
            .unwrap()
            .with_args([
                "test \"$1\" = 'two words' && test -f \"$2\" && echo '[{\"text\":\"7\",\"confidence\":0.9}]'",
                "recognizer",
                "two words",
            ]);

        let candidates = recognizer.recognize(&GrayImage::new(4, 4)).unwrap();
        assert_eq!(candidates, vec![CandidateReading::new("7", 0.9)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_program_with_image_path() {
        // Prints a candidate only when the image file exists.
        let recognizer = CommandRecognizer::new(
            "sh",
            [
                "-c",
                "test -f \"$1\" && echo '{\"text\":\"42\",\"confidence\":0.87}'",
                "recognizer",
            ],
        );
        recognizer.warm_up().unwrap();

        let candidates = recognizer.recognize(&GrayImage::new(4, 4)).unwrap();
        assert_eq!(candidates, vec![CandidateReading::new("42", 0.87)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_recognition_error() {
        let recognizer = CommandRecognizer::new("sh", ["-c", "echo boom >&2; exit 3", "recognizer"]);
        let err = recognizer.recognize(&GrayImage::new(4, 4)).unwrap_err();
        assert!(matches!(err, ScoretrackError::Recognition { .. }));
        assert!(err.to_string().contains("boom"));
    }
}
