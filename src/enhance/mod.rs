//! Raster enhancement: brightness/contrast/sharpness plus deskew and
//! denoise cleanup.
//!
//! Two interchangeable strategies implement the same contract: an external
//! specialized tool (`unpaper`) when present on the host, and a built-in
//! filter chain. Selection is runtime capability probing; the strategies
//! produce visually comparable, not bit-identical, output, and an external
//! tool failure degrades silently to the built-in chain.

pub mod builtin;
pub mod unpaper;

use image::RgbaImage;
use tracing::info;

use crate::document::EnhancementSettings;

pub use builtin::BuiltinEnhancer;
pub use unpaper::UnpaperEnhancer;

/// Enhancement strategy. `enhance` is infallible from the caller's view:
/// an implementation that depends on external state recovers internally.
pub trait Enhancer: Send + Sync {
    fn name(&self) -> &'static str;

    fn enhance(&self, raster: &RgbaImage, settings: &EnhancementSettings) -> RgbaImage;
}

/// Pick the best available strategy for this host.
pub fn select_enhancer() -> Box<dyn Enhancer> {
    if UnpaperEnhancer::probe() {
        info!("unpaper found, using external enhancement tool");
        Box::new(UnpaperEnhancer::new())
    } else {
        info!("unpaper not found, using built-in enhancement chain");
        Box::new(BuiltinEnhancer)
    }
}
