//! Pure transform composition: quarter rotation, fine rotation, crop and
//! smart standard-size upscale collapse into a single affine map from
//! source-raster coordinates to final-render coordinates.

pub mod paper;

use paper::PaperStandard;

/// Relative aspect-ratio tolerance for the smart standard-size policy.
pub const STANDARD_ASPECT_TOLERANCE: f64 = 0.01;

/// Right-angle page rotation, in clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuarterTurns {
    #[default]
    Zero,
    Quarter,
    Half,
    ThreeQuarters,
}

impl QuarterTurns {
    /// Number of clockwise 90-degree turns (0..=3).
    pub fn count(self) -> u8 {
        match self {
            QuarterTurns::Zero => 0,
            QuarterTurns::Quarter => 1,
            QuarterTurns::Half => 2,
            QuarterTurns::ThreeQuarters => 3,
        }
    }

    /// Construct from a signed number of clockwise quarter turns.
    pub fn from_signed(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => QuarterTurns::Zero,
            1 => QuarterTurns::Quarter,
            2 => QuarterTurns::Half,
            _ => QuarterTurns::ThreeQuarters,
        }
    }

    /// Rotate further by a signed delta of quarter turns.
    pub fn turned_by(self, delta: i32) -> Self {
        Self::from_signed(self.count() as i32 + delta)
    }

    /// Whether this rotation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, QuarterTurns::Quarter | QuarterTurns::ThreeQuarters)
    }

    /// Output dimensions after rotating a `width` x `height` raster.
    pub fn rotated_dims(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// A 2D affine transform: `x' = a*x + b*y + e`, `y' = c*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineMap {
    pub fn identity() -> Self {
        AffineMap {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        AffineMap {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        AffineMap {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation about the origin by `theta` radians. Positive angles rotate
    /// clockwise in raster coordinates (y axis pointing down), matching
    /// `imageproc::geometric_transformations::rotate_about_center`.
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        AffineMap {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation about the point `(cx, cy)`.
    pub fn rotation_about(theta: f64, cx: f64, cy: f64) -> Self {
        AffineMap::translation(-cx, -cy)
            .then(&AffineMap::rotation(theta))
            .then(&AffineMap::translation(cx, cy))
    }

    /// The map that rotates a `width` x `height` raster by clockwise quarter
    /// turns, matching `image::imageops::rotate90/180/270`.
    pub fn quarter_rotation(turns: QuarterTurns, width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        match turns {
            QuarterTurns::Zero => AffineMap::identity(),
            // (x, y) -> (h - y, x)
            QuarterTurns::Quarter => AffineMap {
                a: 0.0,
                b: -1.0,
                c: 1.0,
                d: 0.0,
                e: h,
                f: 0.0,
            },
            // (x, y) -> (w - x, h - y)
            QuarterTurns::Half => AffineMap {
                a: -1.0,
                b: 0.0,
                c: 0.0,
                d: -1.0,
                e: w,
                f: h,
            },
            // (x, y) -> (y, w - x)
            QuarterTurns::ThreeQuarters => AffineMap {
                a: 0.0,
                b: 1.0,
                c: -1.0,
                d: 0.0,
                e: 0.0,
                f: w,
            },
        }
    }

    /// Compose: apply `self` first, then `next`.
    pub fn then(&self, next: &AffineMap) -> AffineMap {
        AffineMap {
            a: next.a * self.a + next.b * self.c,
            b: next.a * self.b + next.b * self.d,
            c: next.c * self.a + next.d * self.c,
            d: next.c * self.b + next.d * self.d,
            e: next.a * self.e + next.b * self.f + next.e,
            f: next.c * self.e + next.d * self.f + next.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.e,
            self.c * x + self.d * y + self.f,
        )
    }

    /// Inverse map, or `None` if the transform is singular.
    pub fn inverse(&self) -> Option<AffineMap> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-12 {
            return None;
        }
        let ia = self.d / det;
        let ib = -self.b / det;
        let ic = -self.c / det;
        let id = self.a / det;
        Some(AffineMap {
            a: ia,
            b: ib,
            c: ic,
            d: id,
            e: -(ia * self.e + ib * self.f),
            f: -(ic * self.e + id * self.f),
        })
    }

    /// Axis-aligned bounding box of the four mapped corners of a rectangle.
    pub fn map_rect_bounds(&self, rect: &SourceRect) -> (f64, f64, f64, f64) {
        let corners = [
            self.apply(rect.x0 as f64, rect.y0 as f64),
            self.apply(rect.x1 as f64, rect.y0 as f64),
            self.apply(rect.x0 as f64, rect.y1 as f64),
            self.apply(rect.x1 as f64, rect.y1 as f64),
        ];
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        (min_x, min_y, max_x, max_y)
    }
}

/// A rectangle in source-raster coordinates. Corners are normalized on
/// construction so that `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl SourceRect {
    pub fn new(start: (f32, f32), end: (f32, f32)) -> Self {
        SourceRect {
            x0: start.0.min(end.0),
            y0: start.1.min(end.1),
            x1: start.0.max(end.0),
            y1: start.1.max(end.1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A crop rectangle in the post-rotation coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// An integer rectangle in final-raster pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The composed source-to-final transform for one page, plus the final
/// raster's pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub map: AffineMap,
    pub width: u32,
    pub height: u32,
    /// Standard the crop was upscaled to, when the smart-size policy fired.
    pub standard: Option<PaperStandard>,
}

/// Validate a crop rectangle against the post-rotation frame dimensions.
pub fn validate_crop(crop: &CropRect, frame_w: u32, frame_h: u32) -> crate::error::Result<()> {
    if crop.width == 0 || crop.height == 0 {
        return Err(crate::error::RedactError::geometry(format!(
            "degenerate crop rectangle {}x{}",
            crop.width, crop.height
        )));
    }
    // Widen before adding so hostile coordinates near u32::MAX cannot wrap.
    if u64::from(crop.x) + u64::from(crop.width) > u64::from(frame_w)
        || u64::from(crop.y) + u64::from(crop.height) > u64::from(frame_h)
    {
        return Err(crate::error::RedactError::geometry(format!(
            "crop {}x{}+{}+{} exceeds frame {}x{}",
            crop.width, crop.height, crop.x, crop.y, frame_w, frame_h
        )));
    }
    Ok(())
}

/// Compose the full source-to-final transform for a page.
///
/// Order of operations: clockwise quarter rotation, fine rotation about the
/// rotated frame's center (dimension preserving), crop, then the smart
/// standard-size upscale when the crop aspect ratio matches a recognized
/// standard within [`STANDARD_ASPECT_TOLERANCE`].
///
/// Deterministic: identical inputs always yield the identical transform.
pub fn compose_transform(
    src_width: u32,
    src_height: u32,
    quarter: QuarterTurns,
    fine_rotation_deg: f32,
    crop: Option<CropRect>,
    dpi: u32,
    smart_upscale: bool,
) -> crate::error::Result<PageTransform> {
    let (mut width, mut height) = quarter.rotated_dims(src_width, src_height);
    let mut map = AffineMap::quarter_rotation(quarter, src_width, src_height);

    if fine_rotation_deg != 0.0 {
        let theta = (fine_rotation_deg as f64).to_radians();
        map = map.then(&AffineMap::rotation_about(
            theta,
            width as f64 / 2.0,
            height as f64 / 2.0,
        ));
    }

    let mut standard = None;
    if let Some(crop) = crop {
        validate_crop(&crop, width, height)?;
        map = map.then(&AffineMap::translation(-(crop.x as f64), -(crop.y as f64)));
        width = crop.width;
        height = crop.height;

        if smart_upscale
            && let Some((matched, landscape)) =
                paper::match_standard(width, height, STANDARD_ASPECT_TOLERANCE)
        {
            let (tw, th) = matched.canonical_px(dpi, landscape);
            map = map.then(&AffineMap::scaling(
                tw as f64 / width as f64,
                th as f64 / height as f64,
            ));
            width = tw;
            height = th;
            standard = Some(matched);
        }
    }

    Ok(PageTransform {
        map,
        width,
        height,
        standard,
    })
}
