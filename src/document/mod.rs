//! Document and page entities.
//!
//! A `Document` is created once from per-page source rasters and mutated only
//! through the edit history; nothing here persists across sessions.

pub mod region;

use std::sync::Arc;

use image::RgbaImage;
use serde::Deserialize;

use crate::geometry::{self, CropRect, PageTransform, QuarterTurns, SourceRect};
use region::{RedactionRegion, RegionId};

/// Per-page enhancement parameters.
///
/// `brightness` and `contrast` range over -100..=100 (0 = unchanged),
/// `sharpness` over 0..=100 (0 = unchanged). `deskew` and `denoise` toggle
/// the geometric cleanup passes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EnhancementSettings {
    pub brightness: i8,
    pub contrast: i8,
    pub sharpness: u8,
    pub deskew: bool,
    pub denoise: bool,
}

impl EnhancementSettings {
    /// Whether any pass would modify the raster.
    pub fn is_noop(&self) -> bool {
        *self == EnhancementSettings::default()
    }
}

/// One page: an immutable source raster plus the edit state applied to it.
///
/// The source raster is fixed at the document's target resolution when the
/// PDF is rasterized; every derived raster is recomputed from it on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub source: Arc<RgbaImage>,
    pub quarter_turns: QuarterTurns,
    pub fine_rotation_deg: f32,
    pub crop: Option<CropRect>,
    pub regions: Vec<RedactionRegion>,
    pub enhancement: EnhancementSettings,
}

impl Page {
    pub fn new(source: RgbaImage) -> Self {
        Page {
            source: Arc::new(source),
            quarter_turns: QuarterTurns::Zero,
            fine_rotation_deg: 0.0,
            crop: None,
            regions: Vec::new(),
            enhancement: EnhancementSettings::default(),
        }
    }

    pub fn source_dims(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// Dimensions of the frame crop rectangles are expressed in (after both
    /// rotations, before cropping).
    pub fn rotated_dims(&self) -> (u32, u32) {
        let (w, h) = self.source_dims();
        self.quarter_turns.rotated_dims(w, h)
    }

    /// Compose this page's source-to-final transform.
    pub fn transform(&self, dpi: u32, smart_upscale: bool) -> crate::error::Result<PageTransform> {
        let (w, h) = self.source_dims();
        geometry::compose_transform(
            w,
            h,
            self.quarter_turns,
            self.fine_rotation_deg,
            self.crop,
            dpi,
            smart_upscale,
        )
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub(crate) fn find_region(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }
}

/// An ordered sequence of pages plus the region id allocator.
///
/// Mutation goes through [`crate::history::EditHistory`] exclusively; the
/// exporter only ever takes a shared borrow, which serializes edits against
/// exports at document granularity.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
    next_region_id: u64,
}

impl Document {
    /// Build a document from per-page source rasters, in page order.
    pub fn from_rasters(rasters: Vec<RgbaImage>) -> Self {
        Document {
            pages: rasters.into_iter().map(Page::new).collect(),
            next_region_id: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Total redaction regions across all pages.
    pub fn total_regions(&self) -> usize {
        self.pages.iter().map(Page::region_count).sum()
    }

    /// Allocate a fresh region identity.
    pub fn allocate_region_id(&mut self) -> RegionId {
        let id = RegionId(self.next_region_id);
        self.next_region_id += 1;
        id
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> crate::error::Result<&mut Page> {
        let count = self.pages.len();
        self.pages.get_mut(index).ok_or_else(|| {
            crate::error::RedactError::geometry(format!(
                "page index {index} out of range (document has {count} pages)"
            ))
        })
    }

    /// Convert a rectangle drawn by the editor surface (current render frame)
    /// into source-raster coordinates, using the inverse of the page's
    /// current transform. This is the only accepted input form for
    /// `AddRedaction` edits.
    pub fn render_rect_to_source(
        &self,
        page_index: usize,
        start: (f32, f32),
        end: (f32, f32),
        dpi: u32,
        smart_upscale: bool,
    ) -> crate::error::Result<SourceRect> {
        let page = self.page(page_index).ok_or_else(|| {
            crate::error::RedactError::geometry(format!("page index {page_index} out of range"))
        })?;
        let transform = page.transform(dpi, smart_upscale)?;
        let inverse = transform
            .map
            .inverse()
            .ok_or_else(|| crate::error::RedactError::geometry("singular page transform"))?;
        let (x0, y0) = inverse.apply(start.0 as f64, start.1 as f64);
        let (x1, y1) = inverse.apply(end.0 as f64, end.1 as f64);
        Ok(SourceRect::new((x0 as f32, y0 as f32), (x1 as f32, y1 as f32)))
    }
}
