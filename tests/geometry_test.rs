use pdf_redactor::geometry::paper::{PaperStandard, match_standard};
use pdf_redactor::geometry::{
    AffineMap, CropRect, QuarterTurns, SourceRect, STANDARD_ASPECT_TOLERANCE, compose_transform,
    validate_crop,
};

// ============================================================
// 1. Quarter turns
// ============================================================

#[test]
fn test_quarter_turns_wrap_around() {
    assert_eq!(QuarterTurns::from_signed(0), QuarterTurns::Zero);
    assert_eq!(QuarterTurns::from_signed(1), QuarterTurns::Quarter);
    assert_eq!(QuarterTurns::from_signed(4), QuarterTurns::Zero);
    assert_eq!(QuarterTurns::from_signed(-1), QuarterTurns::ThreeQuarters);
    assert_eq!(QuarterTurns::from_signed(-5), QuarterTurns::ThreeQuarters);
}

#[test]
fn test_quarter_turns_rotated_dims() {
    assert_eq!(QuarterTurns::Zero.rotated_dims(100, 200), (100, 200));
    assert_eq!(QuarterTurns::Quarter.rotated_dims(100, 200), (200, 100));
    assert_eq!(QuarterTurns::Half.rotated_dims(100, 200), (100, 200));
    assert_eq!(QuarterTurns::ThreeQuarters.rotated_dims(100, 200), (200, 100));
}

#[test]
fn test_four_quarter_turns_compose_to_identity() {
    let (w, h) = (640, 480);
    let quarter = AffineMap::quarter_rotation(QuarterTurns::Quarter, w, h);
    // After one turn the frame is h x w, so the remaining turns act on the
    // rotated frames.
    let full = quarter
        .then(&AffineMap::quarter_rotation(QuarterTurns::Quarter, h, w))
        .then(&AffineMap::quarter_rotation(QuarterTurns::Quarter, w, h))
        .then(&AffineMap::quarter_rotation(QuarterTurns::Quarter, h, w));
    let (x, y) = full.apply(123.0, 45.0);
    assert!((x - 123.0).abs() < 1e-9);
    assert!((y - 45.0).abs() < 1e-9);
}

#[test]
fn test_quarter_rotation_maps_pixel_centers() {
    // Clockwise 90 degrees on a 4x2 frame: pixel (0,0) lands at (1,0).
    let map = AffineMap::quarter_rotation(QuarterTurns::Quarter, 4, 2);
    let (x, y) = map.apply(0.5, 0.5);
    assert!((x - 1.5).abs() < 1e-9);
    assert!((y - 0.5).abs() < 1e-9);
}

// ============================================================
// 2. Affine map algebra
// ============================================================

#[test]
fn test_fine_rotation_cancels_with_inverse_angle() {
    let theta = 2.5_f64.to_radians();
    let map = AffineMap::rotation_about(theta, 320.0, 240.0)
        .then(&AffineMap::rotation_about(-theta, 320.0, 240.0));
    let (x, y) = map.apply(10.0, 470.0);
    assert!((x - 10.0).abs() < 1e-9);
    assert!((y - 470.0).abs() < 1e-9);
}

#[test]
fn test_inverse_roundtrip() {
    let map = AffineMap::quarter_rotation(QuarterTurns::Quarter, 800, 600)
        .then(&AffineMap::rotation_about(0.03, 300.0, 400.0))
        .then(&AffineMap::translation(-20.0, -35.0))
        .then(&AffineMap::scaling(1.25, 1.25));
    let inverse = map.inverse().expect("map should be invertible");
    let (x, y) = map.apply(111.0, 222.0);
    let (bx, by) = inverse.apply(x, y);
    assert!((bx - 111.0).abs() < 1e-6);
    assert!((by - 222.0).abs() < 1e-6);
}

#[test]
fn test_singular_map_has_no_inverse() {
    let map = AffineMap::scaling(0.0, 1.0);
    assert!(map.inverse().is_none());
}

#[test]
fn test_map_rect_bounds_covers_rotated_rect() {
    let map = AffineMap::rotation_about(5.0_f64.to_radians(), 50.0, 50.0);
    let rect = SourceRect::new((20.0, 20.0), (80.0, 80.0));
    let (min_x, min_y, max_x, max_y) = map.map_rect_bounds(&rect);
    // The bounding box of a rotated square is strictly larger.
    assert!(max_x - min_x > 60.0);
    assert!(max_y - min_y > 60.0);
    // And it stays centered on the rotation center.
    assert!(((min_x + max_x) / 2.0 - 50.0).abs() < 1e-6);
    assert!(((min_y + max_y) / 2.0 - 50.0).abs() < 1e-6);
}

// ============================================================
// 3. Standard size matching
// ============================================================

#[test]
fn test_match_standard_a4_portrait() {
    // 2480x3508 is A4 at 300 DPI.
    let (standard, landscape) =
        match_standard(2480, 3508, STANDARD_ASPECT_TOLERANCE).expect("should match A4");
    assert_eq!(standard, PaperStandard::A4);
    assert!(!landscape);
}

#[test]
fn test_match_standard_a4_landscape() {
    let (standard, landscape) =
        match_standard(3508, 2480, STANDARD_ASPECT_TOLERANCE).expect("should match A4");
    assert_eq!(standard, PaperStandard::A4);
    assert!(landscape);
}

#[test]
fn test_a_series_ratios_all_resolve_to_a4() {
    // A5 at 300 DPI shares the 1:sqrt(2) ratio.
    let (standard, _) =
        match_standard(1748, 2480, STANDARD_ASPECT_TOLERANCE).expect("should match");
    assert_eq!(standard, PaperStandard::A4);
}

#[test]
fn test_match_standard_rejects_square() {
    assert!(match_standard(1000, 1000, STANDARD_ASPECT_TOLERANCE).is_none());
}

#[test]
fn test_match_standard_rejects_degenerate() {
    assert!(match_standard(0, 3508, STANDARD_ASPECT_TOLERANCE).is_none());
}

#[test]
fn test_canonical_px_a4_at_300dpi() {
    assert_eq!(PaperStandard::A4.canonical_px(300, false), (2480, 3508));
    assert_eq!(PaperStandard::A4.canonical_px(300, true), (3508, 2480));
}

#[test]
fn test_canonical_px_letter_at_300dpi() {
    assert_eq!(PaperStandard::Letter.canonical_px(300, false), (2550, 3300));
}

// ============================================================
// 4. Crop validation
// ============================================================

#[test]
fn test_validate_crop_inside_frame() {
    let crop = CropRect {
        x: 10,
        y: 10,
        width: 80,
        height: 80,
    };
    assert!(validate_crop(&crop, 100, 100).is_ok());
}

#[test]
fn test_validate_crop_degenerate() {
    let crop = CropRect {
        x: 10,
        y: 10,
        width: 0,
        height: 80,
    };
    assert!(validate_crop(&crop, 100, 100).is_err());
}

#[test]
fn test_validate_crop_out_of_bounds() {
    let crop = CropRect {
        x: 50,
        y: 50,
        width: 60,
        height: 60,
    };
    assert!(validate_crop(&crop, 100, 100).is_err());
}

#[test]
fn test_validate_crop_rejects_wrapping_coordinates() {
    // x + width overflows u32; the sum must not wrap into an accepted value.
    let crop = CropRect {
        x: u32::MAX - 10,
        y: 0,
        width: 20,
        height: 10,
    };
    assert!(validate_crop(&crop, 100, 100).is_err());

    let crop = CropRect {
        x: 0,
        y: u32::MAX - 10,
        width: 10,
        height: 20,
    };
    assert!(validate_crop(&crop, 100, 100).is_err());
}

// ============================================================
// 5. Full transform composition
// ============================================================

#[test]
fn test_compose_transform_identity_without_edits() {
    let t = compose_transform(600, 800, QuarterTurns::Zero, 0.0, None, 300, true)
        .expect("compose should succeed");
    assert_eq!((t.width, t.height), (600, 800));
    assert_eq!(t.map, AffineMap::identity());
    assert!(t.standard.is_none());
}

#[test]
fn test_compose_transform_quarter_swaps_dims() {
    let t = compose_transform(600, 800, QuarterTurns::Quarter, 0.0, None, 300, true)
        .expect("compose should succeed");
    assert_eq!((t.width, t.height), (800, 600));
}

#[test]
fn test_compose_transform_a4_crop_upscales_to_canonical() {
    // A crop with the exact A4 ratio, smaller than canonical.
    let crop = CropRect {
        x: 100,
        y: 100,
        width: 1240,
        height: 1754,
    };
    let t = compose_transform(2000, 2200, QuarterTurns::Zero, 0.0, Some(crop), 300, true)
        .expect("compose should succeed");
    assert_eq!((t.width, t.height), (2480, 3508), "should match A4 at 300 DPI");
    assert_eq!(t.standard, Some(PaperStandard::A4));

    // The crop origin maps to the final origin and the crop's far corner to
    // the final far corner.
    let (x, y) = t.map.apply(100.0, 100.0);
    assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
    let (x, y) = t.map.apply(1340.0, 1854.0);
    assert!((x - 2480.0).abs() < 1e-6);
    assert!((y - 3508.0).abs() < 1e-6);
}

#[test]
fn test_compose_transform_non_standard_crop_keeps_native_dims() {
    let crop = CropRect {
        x: 0,
        y: 0,
        width: 500,
        height: 500,
    };
    let t = compose_transform(2000, 2200, QuarterTurns::Zero, 0.0, Some(crop), 300, true)
        .expect("compose should succeed");
    assert_eq!((t.width, t.height), (500, 500));
    assert!(t.standard.is_none());
}

#[test]
fn test_compose_transform_smart_upscale_disabled() {
    let crop = CropRect {
        x: 0,
        y: 0,
        width: 1240,
        height: 1754,
    };
    let t = compose_transform(2000, 2200, QuarterTurns::Zero, 0.0, Some(crop), 300, false)
        .expect("compose should succeed");
    assert_eq!((t.width, t.height), (1240, 1754), "policy off keeps crop dims");
    assert!(t.standard.is_none());
}

#[test]
fn test_compose_transform_rejects_invalid_crop() {
    let crop = CropRect {
        x: 1900,
        y: 0,
        width: 200,
        height: 200,
    };
    let result = compose_transform(2000, 2200, QuarterTurns::Zero, 0.0, Some(crop), 300, true);
    assert!(result.is_err(), "out-of-bounds crop should be rejected");
}

#[test]
fn test_compose_transform_is_deterministic() {
    let crop = CropRect {
        x: 7,
        y: 13,
        width: 1240,
        height: 1754,
    };
    let a = compose_transform(2000, 2200, QuarterTurns::Quarter, 1.25, Some(crop), 300, true)
        .expect("compose should succeed");
    let b = compose_transform(2000, 2200, QuarterTurns::Quarter, 1.25, Some(crop), 300, true)
        .expect("compose should succeed");
    assert_eq!(a, b);
}
