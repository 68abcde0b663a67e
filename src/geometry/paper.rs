//! Standard page sizes for the smart crop-to-standard-size policy.

/// Recognized standard page formats.
///
/// All ISO A-series sizes share the same 1:sqrt(2) aspect ratio, so an
/// A-ratio crop always resolves to A4. Matching is attempted in the order
/// A4, Letter, Legal, which keeps the policy deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperStandard {
    A4,
    Letter,
    Legal,
}

/// Match order for aspect-ratio resolution.
const MATCH_ORDER: [PaperStandard; 3] =
    [PaperStandard::A4, PaperStandard::Letter, PaperStandard::Legal];

impl PaperStandard {
    /// Physical dimensions in millimetres, portrait orientation.
    pub fn dims_mm(self) -> (f64, f64) {
        match self {
            PaperStandard::A4 => (210.0, 297.0),
            PaperStandard::Letter => (215.9, 279.4),
            PaperStandard::Legal => (215.9, 355.6),
        }
    }

    /// Canonical pixel dimensions at the given resolution.
    ///
    /// 1 inch = 25.4 mm; pixel counts are rounded to the nearest integer.
    pub fn canonical_px(self, dpi: u32, landscape: bool) -> (u32, u32) {
        let (wm, hm) = self.dims_mm();
        let w = (wm / 25.4 * dpi as f64).round() as u32;
        let h = (hm / 25.4 * dpi as f64).round() as u32;
        if landscape { (h, w) } else { (w, h) }
    }
}

/// Find the first standard whose aspect ratio matches `width:height` within
/// `tolerance` (relative). Both orientations are checked. Returns the matched
/// standard and whether the match is landscape.
pub fn match_standard(width: u32, height: u32, tolerance: f64) -> Option<(PaperStandard, bool)> {
    if width == 0 || height == 0 {
        return None;
    }
    let ratio = width as f64 / height as f64;

    for standard in MATCH_ORDER {
        let (wm, hm) = standard.dims_mm();
        let portrait = wm / hm;
        if (ratio / portrait - 1.0).abs() <= tolerance {
            return Some((standard, false));
        }
        let landscape = hm / wm;
        if (ratio / landscape - 1.0).abs() <= tolerance {
            return Some((standard, true));
        }
    }
    None
}
