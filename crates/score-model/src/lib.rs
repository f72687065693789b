//! ScoreTrack Score Model
//!
//! Defines the data contracts that flow through the reconstruction pipeline:
//! - **Readings:** Recognizer candidates and per-frame score observations
//! - **Events:** Discrete score changes and the resulting timeline
//! - **Region:** The pixel rectangle holding the score digits
//! - **Report:** The serialized outcome of one processed video
//!
//! Timestamps are seconds since the start of the source video.

pub mod event;
pub mod reading;
pub mod region;
pub mod report;

pub use event::*;
pub use reading::*;
pub use region::*;
pub use report::*;

/// Round `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
