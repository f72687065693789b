//! ScoreTrack Processing Core: score reconstruction
//!
//! Turns a noisy per-frame stream of recognized scores into a clean
//! timeline of score changes:
//! - **Sampler:** Pick frames at a fixed analysis rate and timestamp them
//! - **Reading Extractor:** Arbitrate recognizer candidates into one score
//! - **Sequence Validator:** Drop readings that break plausible progression
//! - **Change Detector:** Collapse validated readings into score events
//!
//! Decoding, cropping, and recognition are collaborators behind the traits
//! in [`pipeline`]. Recorded readings are loaded by [`replay`]; everything
//! else here is pure computation.

pub mod change_detect;
pub mod extractor;
pub mod pattern;
pub mod pipeline;
pub mod replay;
pub mod sampler;
pub mod validator;

pub use change_detect::ChangeDetector;
pub use extractor::{ExtractionConfig, ReadingExtractor};
pub use pattern::analyze_pattern;
pub use pipeline::{
    FramePreprocessor, FrameReadings, FrameSource, Recognizer, ScoreTracker, TrackerConfig,
};
pub use replay::load_readings;
pub use sampler::{FrameSample, FrameSampler};
pub use validator::{SequenceValidator, ValidatedReadings};
