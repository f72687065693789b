//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Score reconstruction defaults.
    pub analysis: AnalysisDefaults,

    /// Crop normalization defaults.
    pub preprocess: PreprocessDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default parameters for the reconstruction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Frames per second selected for analysis.
    pub target_fps: f64,

    /// Candidates at or below this confidence are discarded.
    pub min_confidence: f64,

    /// Smallest plausible score.
    pub min_score: u32,

    /// Largest plausible score.
    pub max_score: u32,

    /// A drop to zero is only a reset when the trusted score exceeds this.
    pub reset_floor: u32,
}

/// Default parameters for the crop normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessDefaults {
    /// Binary threshold on grayscale intensity (0-255).
    pub threshold: u8,

    /// Integer upscale applied after denoising.
    pub scale_factor: u32,

    /// Gaussian sigma for the denoise pass. Zero disables it.
    pub blur_sigma: f32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "scoretrack=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            target_fps: 5.0,
            min_confidence: 0.3,
            min_score: 0,
            max_score: 999,
            reset_floor: 50,
        }
    }
}

impl Default for PreprocessDefaults {
    fn default() -> Self {
        Self {
            threshold: 127,
            scale_factor: 3,
            blur_sigma: 0.8,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("scoretrack").join("config.json")
}
