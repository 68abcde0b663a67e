use image::Rgba;
use serde::Deserialize;

use crate::geometry::SourceRect;

/// Identity of a redaction region within its document.
///
/// Undo of a removal re-inserts *this* region, not a geometric twin, so
/// duplicate and overlapping rectangles behave correctly in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(pub u64);

/// Opaque fill colors accepted for redaction markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillColor {
    #[default]
    Black,
    White,
    Red,
    Green,
}

impl FillColor {
    /// Parse a color name from configuration. The accepted set matches the
    /// marker colors offered in the editor.
    pub fn parse(name: &str) -> crate::error::Result<Self> {
        match name {
            "black" => Ok(FillColor::Black),
            "white" => Ok(FillColor::White),
            "red" => Ok(FillColor::Red),
            "green" => Ok(FillColor::Green),
            other => Err(crate::error::RedactError::config(format!(
                "invalid fill color '{other}' (expected black, white, red or green)"
            ))),
        }
    }

    /// Fully opaque RGBA value for compositing.
    pub fn rgba(self) -> Rgba<u8> {
        match self {
            FillColor::Black => Rgba([0, 0, 0, 255]),
            FillColor::White => Rgba([255, 255, 255, 255]),
            FillColor::Red => Rgba([255, 0, 0, 255]),
            FillColor::Green => Rgba([0, 128, 0, 255]),
        }
    }
}

/// A redaction marker, stored in source-raster coordinates so it stays
/// attached to page content across later rotation and crop edits. Projection
/// into the final raster happens at composite time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedactionRegion {
    pub id: RegionId,
    pub rect: SourceRect,
    pub color: FillColor,
}
