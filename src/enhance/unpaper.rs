//! External enhancement strategy backed by the `unpaper` binary.
//!
//! unpaper covers the deskew/denoise cleanup; pointwise passes run through
//! the shared built-in helpers either way. Any failure (missing binary,
//! non-zero exit, timeout, unreadable output) falls back silently to the
//! built-in chain; an absent tool must never fail an export.

use std::process::Command;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::warn;

use crate::document::EnhancementSettings;
use crate::tool;

use super::builtin::{BuiltinEnhancer, apply_brightness_contrast, apply_sharpness};
use super::Enhancer;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const RUN_TIMEOUT: Duration = Duration::from_secs(30);

pub struct UnpaperEnhancer {
    binary: String,
    fallback: BuiltinEnhancer,
}

impl UnpaperEnhancer {
    pub fn new() -> Self {
        Self::with_binary("unpaper")
    }

    /// Use a specific binary name or path instead of `unpaper` on `PATH`.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        UnpaperEnhancer {
            binary: binary.into(),
            fallback: BuiltinEnhancer,
        }
    }

    /// Whether the unpaper binary is present and responsive.
    pub fn probe() -> bool {
        tool::probe("unpaper", "--version", PROBE_TIMEOUT)
    }

    /// Round-trip the raster through unpaper. unpaper speaks PNM, so the
    /// raster goes out as PPM and comes back the same way.
    fn run_unpaper(
        &self,
        raster: &RgbaImage,
        settings: &EnhancementSettings,
    ) -> crate::error::Result<RgbaImage> {
        let dir = tempfile::tempdir()
            .map_err(|e| crate::error::RedactError::enhancement_tool(e.to_string()))?;
        let input = dir.path().join("page-in.ppm");
        let output = dir.path().join("page-out.ppm");

        DynamicImage::ImageRgba8(raster.clone())
            .to_rgb8()
            .save_with_format(&input, ImageFormat::Pnm)
            .map_err(|e| crate::error::RedactError::enhancement_tool(e.to_string()))?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--layout").arg("single").arg("--overwrite");
        if !settings.deskew {
            cmd.arg("--no-deskew");
        }
        if !settings.denoise {
            cmd.arg("--no-noisefilter");
        }
        cmd.arg(&input).arg(&output);

        let result = tool::run_with_timeout(cmd, RUN_TIMEOUT)
            .map_err(|e| crate::error::RedactError::enhancement_tool(e.to_string()))?;
        if !result.success() {
            return Err(crate::error::RedactError::enhancement_tool(format!(
                "{} exited with {}",
                self.binary, result.status
            )));
        }

        let cleaned = image::open(&output)
            .map_err(|e| crate::error::RedactError::enhancement_tool(e.to_string()))?;
        Ok(cleaned.to_rgba8())
    }
}

impl Default for UnpaperEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

impl Enhancer for UnpaperEnhancer {
    fn name(&self) -> &'static str {
        "unpaper"
    }

    fn enhance(&self, raster: &RgbaImage, settings: &EnhancementSettings) -> RgbaImage {
        if !settings.deskew && !settings.denoise {
            // Nothing for the external tool to do.
            let mut out = apply_brightness_contrast(raster, settings);
            apply_sharpness(&mut out, settings.sharpness);
            return out;
        }

        match self.run_unpaper(raster, settings) {
            Ok(cleaned) => {
                let mut out = apply_brightness_contrast(&cleaned, settings);
                apply_sharpness(&mut out, settings.sharpness);
                out
            }
            Err(e) => {
                warn!(error = %e, "unpaper failed, falling back to built-in chain");
                self.fallback.enhance(raster, settings)
            }
        }
    }
}
