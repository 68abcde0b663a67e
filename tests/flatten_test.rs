use image::{Rgba, RgbaImage};

use pdf_redactor::document::Page;
use pdf_redactor::document::region::{FillColor, RedactionRegion, RegionId};
use pdf_redactor::flatten::{compositor, flatten_page};
use pdf_redactor::geometry::{CropRect, PixelRect, QuarterTurns, SourceRect};

fn gradient_page(width: u32, height: u32) -> Page {
    let source = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    Page::new(source)
}

fn region(id: u64, x0: f32, y0: f32, x1: f32, y1: f32, color: FillColor) -> RedactionRegion {
    RedactionRegion {
        id: RegionId(id),
        rect: SourceRect::new((x0, y0), (x1, y1)),
        color,
    }
}

// ============================================================
// 1. Compositor
// ============================================================

#[test]
fn test_composite_fills_every_pixel_in_bounds() {
    let mut page = gradient_page(64, 48);
    page.regions.push(region(0, 10.0, 10.0, 20.0, 20.0, FillColor::Black));

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(flat.redaction_bounds.len(), 1);
    let bounds = flat.redaction_bounds[0];
    assert_eq!(
        bounds,
        PixelRect {
            x: 10,
            y: 10,
            width: 10,
            height: 10
        }
    );

    let black = Rgba([0, 0, 0, 255]);
    for y in bounds.y..bounds.y + bounds.height {
        for x in bounds.x..bounds.x + bounds.width {
            assert_eq!(*flat.raster.get_pixel(x, y), black, "pixel ({x},{y})");
        }
    }
    // Content outside the region is untouched.
    assert_eq!(*flat.raster.get_pixel(30, 30), *page.source.get_pixel(30, 30));
    assert_eq!(*flat.raster.get_pixel(9, 10), *page.source.get_pixel(9, 10));
}

#[test]
fn test_composite_uses_region_color() {
    let mut page = gradient_page(32, 32);
    page.regions.push(region(0, 0.0, 0.0, 8.0, 8.0, FillColor::White));
    page.regions.push(region(1, 16.0, 16.0, 24.0, 24.0, FillColor::Red));

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(flat.redaction_bounds.len(), 2);
    assert_eq!(*flat.raster.get_pixel(4, 4), Rgba([255, 255, 255, 255]));
    assert_eq!(*flat.raster.get_pixel(20, 20), Rgba([255, 0, 0, 255]));
}

#[test]
fn test_region_outside_raster_is_skipped() {
    let mut page = gradient_page(64, 48);
    page.regions.push(region(0, 200.0, 200.0, 300.0, 300.0, FillColor::Black));

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert!(flat.redaction_bounds.is_empty());
    assert_eq!(flat.raster, *page.source);
}

#[test]
fn test_region_partially_outside_is_clipped() {
    let mut page = gradient_page(64, 48);
    page.regions.push(region(0, 60.0, 44.0, 100.0, 100.0, FillColor::Black));

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(
        flat.redaction_bounds[0],
        PixelRect {
            x: 60,
            y: 44,
            width: 4,
            height: 4
        }
    );
}

#[test]
fn test_project_region_none_when_off_raster() {
    let r = region(0, -50.0, -50.0, -10.0, -10.0, FillColor::Black);
    let map = pdf_redactor::geometry::AffineMap::identity();
    assert!(compositor::project_region(&r, &map, 64, 48).is_none());
}

// ============================================================
// 2. Geometry replay
// ============================================================

#[test]
fn test_quarter_turn_moves_marked_pixel() {
    let mut source = RgbaImage::from_pixel(4, 2, Rgba([255, 255, 255, 255]));
    source.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    let mut page = Page::new(source);
    page.quarter_turns = QuarterTurns::Quarter;

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(flat.raster.dimensions(), (2, 4));
    assert_eq!(*flat.raster.get_pixel(1, 0), Rgba([255, 0, 0, 255]));
}

#[test]
fn test_redaction_follows_quarter_turn() {
    // The region covers the source's top-left pixel; after a clockwise turn
    // that content sits top-right, and the projected fill must land there.
    let mut page = gradient_page(4, 2);
    page.quarter_turns = QuarterTurns::Quarter;
    page.regions.push(region(0, 0.0, 0.0, 1.0, 1.0, FillColor::Black));

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(
        flat.redaction_bounds[0],
        PixelRect {
            x: 1,
            y: 0,
            width: 1,
            height: 1
        }
    );
    assert_eq!(*flat.raster.get_pixel(1, 0), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_redaction_follows_crop() {
    let mut page = gradient_page(100, 80);
    page.crop = Some(CropRect {
        x: 20,
        y: 10,
        width: 50,
        height: 40,
    });
    page.regions.push(region(0, 30.0, 20.0, 40.0, 30.0, FillColor::Black));

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(flat.raster.dimensions(), (50, 40));
    assert_eq!(
        flat.redaction_bounds[0],
        PixelRect {
            x: 10,
            y: 10,
            width: 10,
            height: 10
        }
    );
}

#[test]
fn test_crop_replays_source_window() {
    let page_full = gradient_page(100, 80);
    let mut page = gradient_page(100, 80);
    page.crop = Some(CropRect {
        x: 20,
        y: 10,
        width: 50,
        height: 40,
    });

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(
        *flat.raster.get_pixel(0, 0),
        *page_full.source.get_pixel(20, 10)
    );
    assert_eq!(
        *flat.raster.get_pixel(49, 39),
        *page_full.source.get_pixel(69, 49)
    );
}

#[test]
fn test_standard_ratio_crop_upscales_raster() {
    // 124x175 is within 1% of the A4 ratio; at 75 DPI the canonical A4 frame
    // is 620x877.
    let mut page = gradient_page(200, 200);
    page.crop = Some(CropRect {
        x: 0,
        y: 0,
        width: 124,
        height: 175,
    });

    let flat = flatten_page(&page, 75, true).expect("flatten");
    assert_eq!(flat.raster.dimensions(), (620, 877));
    assert_eq!((flat.transform.width, flat.transform.height), (620, 877));
}

#[test]
fn test_fine_rotation_preserves_dimensions() {
    let mut page = gradient_page(64, 48);
    page.fine_rotation_deg = 3.0;

    let flat = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(flat.raster.dimensions(), (64, 48));
}

#[test]
fn test_redaction_under_fine_rotation_covers_content() {
    // A black square in the source; redact it, rotate finely, and verify no
    // original square pixel survives anywhere in the output.
    let mut source = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
    for y in 20..30 {
        for x in 20..30 {
            source.put_pixel(x, y, Rgba([1, 2, 3, 255]));
        }
    }
    let mut page = Page::new(source);
    page.fine_rotation_deg = 4.0;
    page.regions.push(region(0, 19.0, 19.0, 31.0, 31.0, FillColor::White));

    let flat = flatten_page(&page, 300, true).expect("flatten");
    let marker = Rgba([1, 2, 3, 255]);
    for (x, y, px) in flat.raster.enumerate_pixels() {
        assert_ne!(*px, marker, "source content leaked at ({x},{y})");
    }
}

#[test]
fn test_source_raster_is_never_modified() {
    let mut page = gradient_page(64, 48);
    let before = (*page.source).clone();
    page.regions.push(region(0, 10.0, 10.0, 20.0, 20.0, FillColor::Black));

    let _ = flatten_page(&page, 300, true).expect("flatten");
    assert_eq!(*page.source, before);
}
