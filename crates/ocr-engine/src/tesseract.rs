//! Digit recognition with the Tesseract command-line tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::GrayImage;
use scoretrack_common::error::{ScoretrackError, ScoretrackResult};
use scoretrack_common::tools::command_exists;
use scoretrack_processing_core::Recognizer;
use scoretrack_score_model::reading::CandidateReading;
use tempfile::NamedTempFile;

/// Page segmentation mode 7: the image holds a single text line.
const SINGLE_LINE_PSM: u8 = 7;

/// Runs `tesseract` once per image and reports each recognized word.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: String,
    tessdata_dir: Option<PathBuf>,
    psm: u8,
    whitelist: String,
}

impl TesseractRecognizer {
    pub fn new() -> Self {
        Self {
            executable: "tesseract".to_string(),
            tessdata_dir: None,
            psm: SINGLE_LINE_PSM,
            whitelist: "0123456789".to_string(),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    /// `tesseract <image> stdout [--tessdata-dir <dir>]`
    fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(image).arg("stdout");
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer<GrayImage> for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn warm_up(&self) -> ScoretrackResult<()> {
        if !command_exists(&self.executable) {
            return Err(ScoretrackError::recognition(format!(
                "{} is not installed or not on PATH",
                self.executable
            )));
        }

        let output = Command::new(&self.executable)
            .arg("--version")
            .output()
            .map_err(|e| ScoretrackError::recognition(format!("Failed to run tesseract: {e}")))?;

        let version = String::from_utf8_lossy(&output.stdout);
        tracing::info!(
            version = version.lines().next().unwrap_or("unknown").trim(),
            "Tesseract ready"
        );
        Ok(())
    }

    fn recognize(&self, image: &GrayImage) -> ScoretrackResult<Vec<CandidateReading>> {
        let input = NamedTempFile::with_suffix(".png")?;
        image
            .save(input.path())
            .map_err(|e| ScoretrackError::recognition(format!("Failed to write crop: {e}")))?;

        let output = self
            .command(input.path())
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={}", self.whitelist))
            .arg("tsv")
            .output()
            .map_err(|e| ScoretrackError::recognition(format!("Failed to run tesseract: {e}")))?;

        if !output.status.success() {
            return Err(ScoretrackError::recognition(format!(
                "tesseract failed (status {}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_tsv_words(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Word-level candidates from Tesseract TSV output.
///
/// Confidence is rescaled from 0..100 to 0..1. Rows that are not words,
/// have no text, or carry Tesseract's `-1` "no confidence" marker are skipped.
pub fn parse_tsv_words(tsv: &str) -> Vec<CandidateReading> {
    tsv.lines()
        .skip(1)
        .filter_map(|line| {
            // level, page_num, block_num, par_num, line_num, word_num,
            // left, top, width, height, conf, text
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 12 || fields[0] != "5" {
                return None;
            }

            let text = fields[11].trim();
            let confidence = fields[10].trim().parse::<f64>().ok()?;
            if text.is_empty() || confidence < 0.0 {
                return None;
            }

            Some(CandidateReading::new(text, (confidence / 100.0).min(1.0)))
        })
        .collect()
}
