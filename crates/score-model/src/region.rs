//! The pixel rectangle that holds the score digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested crop rectangle in source pixel coordinates.
///
/// Values come straight from the user and may lie partly or wholly
/// outside the frame; use [`CropRect::clamp_to`] before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// A crop rectangle resolved against concrete frame dimensions.
///
/// Always non-empty and fully inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp to a `frame_width` x `frame_height` frame.
    ///
    /// The left/top edge is clamped into `[0, dim - 1]` and the right/bottom
    /// edge into `[0, dim]`. Returns `None` when nothing of the rectangle
    /// remains.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<PixelBounds> {
        if frame_width == 0 || frame_height == 0 {
            return None;
        }

        let w = i64::from(frame_width);
        let h = i64::from(frame_height);

        let x1 = self.x.clamp(0, w - 1);
        let y1 = self.y.clamp(0, h - 1);
        let x2 = self.x.saturating_add(self.width).clamp(0, w);
        let y2 = self.y.saturating_add(self.height).clamp(0, h);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(PixelBounds {
            x: x1 as u32,
            y: y1 as u32,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }
}

impl Default for CropRect {
    fn default() -> Self {
        Self::new(0, 0, 100, 100)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// Errors from parsing an `x,y,width,height` rectangle.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegionParseError {
    #[error("expected 4 comma-separated values (x,y,width,height), got {0}")]
    WrongArity(usize),

    #[error("invalid integer {value:?} for {field}")]
    InvalidNumber { field: &'static str, value: String },
}

impl FromStr for CropRect {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const FIELDS: [&str; 4] = ["x", "y", "width", "height"];

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != FIELDS.len() {
            return Err(RegionParseError::WrongArity(parts.len()));
        }

        let mut values = [0i64; 4];
        for (i, part) in parts.iter().enumerate() {
            values[i] = part
                .parse()
                .map_err(|_| RegionParseError::InvalidNumber {
                    field: FIELDS[i],
                    value: part.to_string(),
                })?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}
