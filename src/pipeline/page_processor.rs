//! Per-page pipeline: geometry -> redaction compositor -> enhancement ->
//! OCR -> JPEG encode.
//!
//! The whole stage is a pure function of one page's state plus the export
//! configuration, which is what allows the exporter to fan pages out across
//! worker threads.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, warn};

use crate::config::merged::MergedConfig;
use crate::document::Page;
use crate::enhance::Enhancer;
use crate::flatten::{self, FlattenedPage};
use crate::geometry::PixelRect;
use crate::ocr::{TextRecognizer, TextSpan};

/// Single page processing result.
pub struct ProcessedPage {
    pub page_index: usize,
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub text: Vec<TextSpan>,
    /// Final-raster bounds of the composited redaction regions.
    pub redaction_bounds: Vec<PixelRect>,
}

/// Process a single page into its flattened, encoded form.
///
/// Ordering invariant: redactions are baked in before the raster reaches
/// enhancement or the recognizer, so no recognizable content from a redacted
/// area survives into the output image or its text layer. OCR failure is
/// downgraded to an empty text layer; it never fails the page.
pub fn process_page(
    page_index: usize,
    page: &Page,
    config: &MergedConfig,
    enhancer: &dyn Enhancer,
    recognizer: Option<&dyn TextRecognizer>,
) -> crate::error::Result<ProcessedPage> {
    let FlattenedPage {
        mut raster,
        transform,
        redaction_bounds,
    } = flatten::flatten_page(page, config.dpi, config.smart_upscale)?;
    debug!(
        page_index,
        width = transform.width,
        height = transform.height,
        regions = redaction_bounds.len(),
        standard = ?transform.standard,
        "page flattened"
    );

    if !page.enhancement.is_noop() {
        raster = enhancer.enhance(&raster, &page.enhancement);
    }

    let text = match recognizer {
        Some(recognizer) => match recognizer.recognize(&raster) {
            Ok(spans) => spans,
            Err(e) => {
                warn!(page_index, error = %e, "OCR unavailable, exporting page without text layer");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let (width, height) = raster.dimensions();
    let rgb = DynamicImage::ImageRgba8(raster).to_rgb8();
    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, config.jpeg_quality);
    rgb.write_with_encoder(encoder)?;

    Ok(ProcessedPage {
        page_index,
        jpeg,
        width,
        height,
        text,
        redaction_bounds,
    })
}
