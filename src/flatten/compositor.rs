//! Bakes redaction regions into a final-raster page.
//!
//! Regions are stored in source space; each one is projected through the
//! page's source-to-final map, widened to its axis-aligned bounding box (a
//! fine-rotated rectangle must stay fully covered), clipped to the raster,
//! and filled with a fully opaque color. The compositor runs strictly before
//! enhancement and OCR so no recognizable content survives into either.

use image::RgbaImage;

use crate::document::region::RedactionRegion;
use crate::geometry::{AffineMap, PixelRect};

/// Project a region into final-raster bounds, clipped. Returns `None` when
/// the mapped rectangle falls entirely outside the raster.
pub fn project_region(
    region: &RedactionRegion,
    map: &AffineMap,
    raster_width: u32,
    raster_height: u32,
) -> Option<PixelRect> {
    let (min_x, min_y, max_x, max_y) = map.map_rect_bounds(&region.rect);

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(raster_width);
    let y1 = (max_y.ceil().max(0.0) as u32).min(raster_height);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(PixelRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

/// Fill every region's projection with its opaque color. 100% of pixels in
/// each mapped rectangle are overwritten; application order is irrelevant
/// because regions only add opaque coverage.
///
/// Returns the final-space bounds of each composited region.
pub fn composite(
    raster: &mut RgbaImage,
    regions: &[RedactionRegion],
    map: &AffineMap,
) -> Vec<PixelRect> {
    let (width, height) = raster.dimensions();
    let mut bounds = Vec::with_capacity(regions.len());

    for region in regions {
        let Some(rect) = project_region(region, map, width, height) else {
            continue;
        };
        let fill = region.color.rgba();
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                raster.put_pixel(x, y, fill);
            }
        }
        bounds.push(rect);
    }

    bounds
}
