//! Built-in enhancement chain; always available, used directly or as the
//! fallback behind the external tool.

use image::imageops;
use image::RgbaImage;
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use imageproc::hough::{LineDetectionOptions, detect_lines};
use tracing::debug;

use crate::document::EnhancementSettings;

use super::Enhancer;

/// Skew corrections below this are noise, above it a misdetection.
const DESKEW_MIN_DEG: f32 = 0.5;
const DESKEW_MAX_DEG: f32 = 20.0;

pub struct BuiltinEnhancer;

impl Enhancer for BuiltinEnhancer {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn enhance(&self, raster: &RgbaImage, settings: &EnhancementSettings) -> RgbaImage {
        let mut out = apply_brightness_contrast(raster, settings);

        if settings.deskew
            && let Some(angle) = estimate_skew_deg(&out)
        {
            debug!(angle, "correcting skew");
            out = rotate_about_center(
                &out,
                (-angle).to_radians(),
                Interpolation::Bilinear,
                image::Rgba([255, 255, 255, 255]),
            );
        }

        if settings.denoise {
            out = median_filter(&out, 1, 1);
        }

        apply_sharpness(&mut out, settings.sharpness);
        out
    }
}

/// Pointwise passes shared with the external strategy (the tool only covers
/// deskew/denoise).
pub(super) fn apply_brightness_contrast(
    raster: &RgbaImage,
    settings: &EnhancementSettings,
) -> RgbaImage {
    let mut out = raster.clone();
    if settings.brightness != 0 {
        // -100..=100 maps to an additive offset of -255..=255 per channel.
        let offset = (settings.brightness as f32 * 2.55).round() as i32;
        out = imageops::colorops::brighten(&out, offset);
    }
    if settings.contrast != 0 {
        out = imageops::colorops::contrast(&out, settings.contrast as f32);
    }
    out
}

pub(super) fn apply_sharpness(raster: &mut RgbaImage, sharpness: u8) {
    if sharpness > 0 {
        // 0..=100 maps to the unsharp-mask blur radius 0..=4.
        let sigma = sharpness as f32 / 25.0;
        *raster = imageops::unsharpen(raster, sigma, 1);
    }
}

/// Estimate the dominant text-line skew in degrees, or `None` when the page
/// has no reliable line structure. Positive values mean the content is
/// rotated clockwise.
///
/// Detection: grayscale, blur, Canny edges, Hough lines; near-horizontal
/// lines have a polar angle near 90 degrees and their median deviation from
/// it is the skew. Corrections outside [`DESKEW_MIN_DEG`], [`DESKEW_MAX_DEG`]
/// are discarded.
pub(super) fn estimate_skew_deg(raster: &RgbaImage) -> Option<f32> {
    let gray = imageops::grayscale(raster);
    let blurred = gaussian_blur_f32(&gray, 2.0);
    let edges = canny(&blurred, 50.0, 150.0);

    // Vote threshold scales with resolution so detection behaves the same
    // at 150 and 600 DPI.
    let diagonal =
        ((raster.width() as f64).powi(2) + (raster.height() as f64).powi(2)).sqrt();
    let options = LineDetectionOptions {
        vote_threshold: (diagonal * 0.25).max(80.0) as u32,
        suppression_radius: 8,
    };
    let lines = detect_lines(&edges, options);

    let mut deviations: Vec<i32> = lines
        .iter()
        .map(|line| line.angle_in_degrees as i32 - 90)
        .filter(|dev| dev.unsigned_abs() <= DESKEW_MAX_DEG as u32)
        .collect();
    if deviations.is_empty() {
        return None;
    }
    deviations.sort_unstable();
    let skew = deviations[deviations.len() / 2] as f32;

    if skew.abs() > DESKEW_MIN_DEG {
        Some(skew)
    } else {
        None
    }
}
