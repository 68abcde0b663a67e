pub mod compositor;
pub mod renderer;

use image::RgbaImage;

use crate::document::Page;
use crate::geometry::{PageTransform, PixelRect};

/// A page raster with all geometry applied and all redactions baked in.
pub struct FlattenedPage {
    pub raster: RgbaImage,
    pub transform: PageTransform,
    /// Final-raster bounds of every composited redaction region.
    pub redaction_bounds: Vec<PixelRect>,
}

/// Flatten one page: replay its geometry from the source raster, then bake
/// every redaction region into the result.
///
/// Redactions are composited here, before the raster is handed to
/// enhancement or OCR, so redacted content never reaches either stage.
pub fn flatten_page(
    page: &Page,
    dpi: u32,
    smart_upscale: bool,
) -> crate::error::Result<FlattenedPage> {
    let (transform, mut raster) = renderer::render_final(page, dpi, smart_upscale)?;
    let redaction_bounds = compositor::composite(&mut raster, &page.regions, &transform.map);
    Ok(FlattenedPage {
        raster,
        transform,
        redaction_bounds,
    })
}
