//! Stream metadata via `ffprobe`.

use std::path::Path;
use std::process::Command;

use scoretrack_common::error::{ScoretrackError, ScoretrackResult};

/// Properties of the first video stream in a container.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    /// Coded width, before any display rotation.
    pub width: u32,
    /// Coded height, before any display rotation.
    pub height: u32,

    /// Display rotation in degrees, normalized to 0, 90, 180, or 270.
    pub rotation: u32,

    /// Native frame rate; `None` when the container does not report one.
    pub frame_rate: Option<f64>,

    /// Frame count from the container header, if present.
    pub frame_count: Option<u64>,

    pub duration_secs: Option<f64>,
}

impl VideoInfo {
    /// Whether `ffmpeg` output is transposed relative to the coded size.
    pub fn is_transposed(&self) -> bool {
        self.rotation % 180 == 90
    }

    /// Width of frames as `ffmpeg` emits them, after autorotation.
    pub fn frame_width(&self) -> u32 {
        if self.is_transposed() {
            self.height
        } else {
            self.width
        }
    }

    /// Height of frames as `ffmpeg` emits them, after autorotation.
    pub fn frame_height(&self) -> u32 {
        if self.is_transposed() {
            self.width
        } else {
            self.height
        }
    }

    /// Bytes in one decoded RGB24 frame.
    pub fn rgb_frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Read stream properties for `path`.
pub fn probe_video(path: &Path) -> ScoretrackResult<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames,duration\
             :stream_tags=rotate:stream_side_data=rotation",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| ScoretrackError::source_unavailable(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(ScoretrackError::source_unavailable(format!(
            "ffprobe could not open {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&raw).ok_or_else(|| {
        ScoretrackError::source_unavailable(format!(
            "{} has no decodable video stream",
            path.display()
        ))
    })
}

/// Parse `key=value` lines printed by `ffprobe -of default=noprint_wrappers=1`.
///
/// Returns `None` unless both dimensions are present and non-zero.
pub fn parse_probe_output(raw: &str) -> Option<VideoInfo> {
    let mut width = None;
    let mut height = None;
    let mut r_frame_rate = None;
    let mut avg_frame_rate = None;
    let mut frame_count = None;
    let mut duration_secs = None;
    let mut side_data_rotation = None;
    let mut tag_rotation = None;

    for line in raw.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "width" => width = value.parse::<u32>().ok(),
            "height" => height = value.parse::<u32>().ok(),
            "r_frame_rate" => r_frame_rate = parse_frame_rate(value),
            "avg_frame_rate" => avg_frame_rate = parse_frame_rate(value),
            "nb_frames" => frame_count = value.parse::<u64>().ok().filter(|&n| n > 0),
            "rotation" => side_data_rotation = parse_rotation(value),
            "TAG:rotate" => tag_rotation = parse_rotation(value),
            "duration" => {
                duration_secs = value
                    .parse::<f64>()
                    .ok()
                    .filter(|d| d.is_finite() && *d > 0.0)
            }
            _ => {}
        }
    }

    let width = width.filter(|&w| w > 0)?;
    let height = height.filter(|&h| h > 0)?;

    Some(VideoInfo {
        width,
        height,
        rotation: side_data_rotation.or(tag_rotation).unwrap_or(0),
        frame_rate: r_frame_rate.or(avg_frame_rate),
        frame_count,
        duration_secs,
    })
}

/// Parse a display rotation such as `-90` or `90.00` into clockwise
/// quarter turns expressed in degrees.
fn parse_rotation(value: &str) -> Option<u32> {
    let degrees = value.trim().parse::<f64>().ok().filter(|d| d.is_finite())?;
    let quarter_turns = (degrees / 90.0).round() as i64;
    Some((quarter_turns.rem_euclid(4) * 90) as u32)
}

/// Parse an ffprobe rate such as `30000/1001` or `25`.
///
/// Zero, negative, and `0/0` rates are reported as unknown.
pub fn parse_frame_rate(value: &str) -> Option<f64> {
    let rate = match value.trim().split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.trim().parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate_fractions() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_unknown() {
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("0/1"), None);
        assert_eq!(parse_frame_rate("N/A"), None);
        assert_eq!(parse_frame_rate(""), None);
    }

    #[test]
    fn test_parse_probe_output() {
        let raw = "width=1280\nheight=720\nr_frame_rate=30/1\navg_frame_rate=30/1\nduration=12.5\nnb_frames=375\n";
        let info = parse_probe_output(raw).unwrap();
        assert_eq!(info.width, 1280);
        assert_eq!(info.height, 720);
        assert_eq!(info.frame_rate, Some(30.0));
        assert_eq!(info.frame_count, Some(375));
        assert_eq!(info.duration_secs, Some(12.5));
        assert_eq!(info.rgb_frame_len(), 1280 * 720 * 3);
    }

    #[test]
    fn test_parse_probe_output_prefers_nominal_rate() {
        let raw = "width=640\nheight=480\nr_frame_rate=60/1\navg_frame_rate=30/1\nnb_frames=N/A\nduration=N/A\n";
        let info = parse_probe_output(raw).unwrap();
        assert_eq!(info.frame_rate, Some(60.0));
        assert_eq!(info.frame_count, None);
        assert_eq!(info.duration_secs, None);
    }

    #[test]
    fn test_parse_probe_output_falls_back_to_average_rate() {
        let raw = "width=640\nheight=480\nr_frame_rate=0/0\navg_frame_rate=24/1\n";
        assert_eq!(parse_probe_output(raw).unwrap().frame_rate, Some(24.0));
    }

    #[test]
    fn test_parse_probe_output_rotated_stream() {
        let raw = "width=1920\nheight=1080\nr_frame_rate=30/1\nside_data_type=Display Matrix\nrotation=-90\n";
        let info = parse_probe_output(raw).unwrap();
        assert_eq!(info.rotation, 270);
        assert!(info.is_transposed());
        assert_eq!((info.frame_width(), info.frame_height()), (1080, 1920));
        assert_eq!(info.rgb_frame_len(), 1920 * 1080 * 3);

        let tagged = parse_probe_output("width=1920\nheight=1080\nTAG:rotate=90\n").unwrap();
        assert_eq!(tagged.rotation, 90);
        assert_eq!((tagged.frame_width(), tagged.frame_height()), (1080, 1920));

        let flipped = parse_probe_output("width=640\nheight=480\nrotation=180\n").unwrap();
        assert!(!flipped.is_transposed());
        assert_eq!((flipped.frame_width(), flipped.frame_height()), (640, 480));
    }

    #[test]
    fn test_parse_probe_output_unrotated_by_default() {
        let info = parse_probe_output("width=640\nheight=480\nrotation=N/A\n").unwrap();
        assert_eq!(info.rotation, 0);
        assert_eq!((info.frame_width(), info.frame_height()), (640, 480));
    }

    #[test]
    fn test_parse_probe_output_requires_dimensions() {
        assert!(parse_probe_output("").is_none());
        assert!(parse_probe_output("width=0\nheight=720\n").is_none());
        assert!(parse_probe_output("height=720\n").is_none());
    }
}
