//! Scoreboard crop normalization.
//!
//! Overlay scores are light digits on a dark banner. Recognizers do best on
//! large dark glyphs over a clean light background, so each crop is
//! grayscaled, binarized, inverted, softened, and upscaled.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use scoretrack_common::config::PreprocessDefaults;
use scoretrack_common::error::{ScoretrackError, ScoretrackResult};
use scoretrack_processing_core::FramePreprocessor;
use scoretrack_score_model::region::CropRect;

/// Crops the score region out of decoded frames and normalizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreboardPreprocessor {
    threshold: u8,
    scale_factor: u32,
    blur_sigma: f32,
}

impl ScoreboardPreprocessor {
    /// A `scale_factor` of 0 is treated as 1; a `blur_sigma` of 0 disables blurring.
    pub fn new(threshold: u8, scale_factor: u32, blur_sigma: f32) -> Self {
        Self {
            threshold,
            scale_factor: scale_factor.max(1),
            blur_sigma: blur_sigma.max(0.0),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn scale_factor(&self) -> u32 {
        self.scale_factor
    }

    /// Normalize an already-cropped region.
    pub fn normalize(&self, crop: &RgbImage) -> ScoretrackResult<GrayImage> {
        let (width, height) = crop.dimensions();
        let (Some(out_w), Some(out_h)) = (
            width.checked_mul(self.scale_factor),
            height.checked_mul(self.scale_factor),
        ) else {
            return Err(ScoretrackError::preprocess(format!(
                "{width}x{height} crop cannot be scaled by {}",
                self.scale_factor
            )));
        };

        let gray = imageops::grayscale(crop);
        let mut binary = binarize_inverted(&gray, self.threshold);

        if self.blur_sigma > 0.0 {
            binary = imageops::blur(&binary, self.blur_sigma);
        }

        if self.scale_factor == 1 {
            return Ok(binary);
        }
        Ok(imageops::resize(&binary, out_w, out_h, FilterType::CatmullRom))
    }
}

impl Default for ScoreboardPreprocessor {
    fn default() -> Self {
        Self::from(&PreprocessDefaults::default())
    }
}

impl From<&PreprocessDefaults> for ScoreboardPreprocessor {
    fn from(defaults: &PreprocessDefaults) -> Self {
        Self::new(defaults.threshold, defaults.scale_factor, defaults.blur_sigma)
    }
}

impl FramePreprocessor<RgbImage> for ScoreboardPreprocessor {
    type Output = GrayImage;

    fn prepare(&self, frame: &RgbImage, region: &CropRect) -> ScoretrackResult<Option<GrayImage>> {
        crop_region(frame, region)
            .map(|crop| self.normalize(&crop))
            .transpose()
    }
}

/// Cut `region` out of `frame`, clamped to the frame bounds.
///
/// Returns `None` when nothing of the region lies inside the frame.
pub fn crop_region(frame: &RgbImage, region: &CropRect) -> Option<RgbImage> {
    let (width, height) = frame.dimensions();
    let bounds = region.clamp_to(width, height)?;
    Some(imageops::crop_imm(frame, bounds.x, bounds.y, bounds.width, bounds.height).to_image())
}

/// Pixels brighter than `threshold` become black; everything else white.
pub fn binarize_inverted(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let value = if gray.get_pixel(x, y)[0] > threshold {
            0u8
        } else {
            255u8
        };
        Luma([value])
    })
}
