//! Text recognition over flattened page rasters.
//!
//! Recognition runs only on the fully flattened, redacted, enhanced raster,
//! never on pre-redaction content, so redacted regions stay unsearchable.
//! Failures are reported as `OcrUnavailable` and the export proceeds without
//! a text layer; OCR must never block export of the redacted image content.

pub mod tesseract;

use image::RgbaImage;

use crate::geometry::PixelRect;

pub use tesseract::TesseractOcr;

/// A recognized word with its bounding box in the coordinate frame of the
/// raster it was recognized from.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub bounds: PixelRect,
}

/// Text recognition engine contract.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, raster: &RgbaImage) -> crate::error::Result<Vec<TextSpan>>;
}
