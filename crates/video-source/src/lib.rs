//! ScoreTrack Video Source
//!
//! Frame decoding for match recordings. Containers are probed with
//! `ffprobe` and decoded to RGB frames by an `ffmpeg` child process.

pub mod ffmpeg;
pub mod probe;

pub use ffmpeg::FfmpegSource;
pub use probe::{parse_frame_rate, probe_video, VideoInfo};
