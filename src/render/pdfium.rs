//! pdfium-render wrapper: source PDF -> per-page RGBA rasters (in-memory).
//!
//! This is the only place that touches PDF structure on the input side; the
//! core receives raw pixel buffers and page order, nothing else.

use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(crate::error::RedactError::rasterization(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(crate::error::RedactError::rasterization(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        crate::error::RedactError::rasterization(
            "pdfium library path contains non-UTF-8 characters",
        )
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| crate::error::RedactError::rasterization(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// Rasterize every page of a PDF at the given DPI, in document order.
///
/// Each page is rendered to an in-memory RGBA buffer sized from the page's
/// point dimensions (1 point = 1/72 inch). A page that cannot be read fails
/// the whole call; a document with silently missing pages must never reach
/// the editor.
pub fn rasterize_document(pdf_path: &Path, dpi: u32) -> crate::error::Result<Vec<RgbaImage>> {
    let pdfium = create_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| crate::error::RedactError::rasterization(e.to_string()))?;

    let mut rasters = Vec::with_capacity(document.pages().len() as usize);
    for page in document.pages().iter() {
        let width_pts = page.width().value;
        let height_pts = page.height().value;
        let width_px = (width_pts * dpi as f32 / 72.0).round() as i32;
        let height_px = (height_pts * dpi as f32 / 72.0).round() as i32;

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| crate::error::RedactError::rasterization(e.to_string()))?;
        rasters.push(bitmap.as_image().to_rgba8());
    }

    Ok(rasters)
}
