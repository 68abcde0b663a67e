//! Replays a page's geometry state (rotation, crop, smart upscale) from the
//! immutable source raster into the final raster.
//!
//! The raster operations here must stay consistent with the affine map the
//! geometry engine produces for the same inputs: redaction projection relies
//! on that correspondence.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

use crate::document::Page;
use crate::geometry::PageTransform;

/// Pixels uncovered by the dimension-preserving fine rotation.
const ROTATION_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render the page's final raster and the matching source-to-final map.
///
/// Deterministic: identical page state and settings always produce the same
/// pixels. The source raster is never modified.
pub fn render_final(
    page: &Page,
    dpi: u32,
    smart_upscale: bool,
) -> crate::error::Result<(PageTransform, RgbaImage)> {
    let transform = page.transform(dpi, smart_upscale)?;

    let mut raster = match page.quarter_turns.count() {
        0 => (*page.source).clone(),
        1 => imageops::rotate90(&*page.source),
        2 => imageops::rotate180(&*page.source),
        _ => imageops::rotate270(&*page.source),
    };

    if page.fine_rotation_deg != 0.0 {
        let theta = page.fine_rotation_deg.to_radians();
        raster = rotate_about_center(&raster, theta, Interpolation::Bilinear, ROTATION_FILL);
    }

    if let Some(crop) = page.crop {
        raster = imageops::crop_imm(&raster, crop.x, crop.y, crop.width, crop.height).to_image();
    }

    if (raster.width(), raster.height()) != (transform.width, transform.height) {
        raster = imageops::resize(
            &raster,
            transform.width,
            transform.height,
            FilterType::Lanczos3,
        );
    }

    Ok((transform, raster))
}
