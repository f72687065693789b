//! ScoreTrack Common Utilities
//!
//! Shared infrastructure for all ScoreTrack crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading
//! - External tool lookup

pub mod config;
pub mod error;
pub mod logging;
pub mod tools;

pub use config::*;
pub use error::*;
