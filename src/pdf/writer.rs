//! Flattened-PDF assembly.
//!
//! Every output page is a single full-bleed JPEG image XObject plus an
//! optional invisible text layer (text rendering mode 3). No vector or text
//! content from the source document survives into the output.

use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::ocr::TextSpan;

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f64 = 72.0;

/// Builds the output document page by page, in document order.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    font_id: Option<ObjectId>,
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        PdfWriter {
            doc,
            pages_id,
            page_ids: Vec::new(),
            font_id: None,
        }
    }

    /// Append one flattened page. `jpeg_data` is the encoded final raster of
    /// `width` x `height` pixels at `dpi`; `text` is the OCR text layer in
    /// raster pixel coordinates (empty when OCR is disabled or unavailable).
    pub fn add_page(
        &mut self,
        jpeg_data: &[u8],
        width: u32,
        height: u32,
        dpi: u32,
        text: &[TextSpan],
    ) -> crate::error::Result<ObjectId> {
        let width_pts = width as f64 * POINTS_PER_INCH / dpi as f64;
        let height_pts = height as f64 * POINTS_PER_INCH / dpi as f64;

        let image_id = self.add_image_xobject(jpeg_data, width, height);

        let mut xobjects = lopdf::Dictionary::new();
        xobjects.set("Im0", Object::Reference(image_id));
        let mut resources = dictionary! {
            "XObject" => Object::Dictionary(xobjects),
        };
        if !text.is_empty() {
            let font_id = self.font_id();
            let mut fonts = lopdf::Dictionary::new();
            fonts.set("F0", Object::Reference(font_id));
            resources.set("Font", Object::Dictionary(fonts));
        }
        let resources_id = self.doc.add_object(resources);

        let mut content = format!(
            "q {width_pts:.4} 0 0 {height_pts:.4} 0 0 cm /Im0 Do Q"
        );
        if !text.is_empty() {
            content.push(' ');
            content.push_str(&build_text_layer(text, height_pts, dpi));
        }
        let content_id = self
            .doc
            .add_object(Object::Stream(Stream::new(dictionary! {}, content.into_bytes())));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pts as f32),
                Object::Real(height_pts as f32),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// Finish the document and serialize it.
    pub fn save_to_bytes(&mut self) -> crate::error::Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let count = self.page_ids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        // clone to avoid borrowing issues with save_to (takes &mut self in lopdf)
        self.doc
            .clone()
            .save_to(&mut buf)
            .map_err(|e| crate::error::RedactError::pdf_write(e.to_string()))?;
        Ok(buf)
    }

    fn add_image_xobject(&mut self, jpeg_data: &[u8], width: u32, height: u32) -> ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        self.doc
            .add_object(Object::Stream(Stream::new(dict, jpeg_data.to_vec())))
    }

    fn font_id(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        self.font_id = Some(id);
        id
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Invisible text operators for one page.
///
/// Raster pixel coordinates (origin top-left, y down) flip into PDF user
/// space (origin bottom-left, y up); each word is placed at the bottom edge
/// of its bounding box with a font size matching the box height, rendered in
/// mode 3 (neither fill nor stroke).
fn build_text_layer(text: &[TextSpan], page_height_pts: f64, dpi: u32) -> String {
    let scale = POINTS_PER_INCH / dpi as f64;
    let mut ops = String::from("BT 3 Tr /F0 1 Tf");
    for span in text {
        let size = (span.bounds.height as f64 * scale).max(1.0);
        let x = span.bounds.x as f64 * scale;
        let y = page_height_pts - (span.bounds.y + span.bounds.height) as f64 * scale;
        ops.push_str(&format!(
            " /F0 {size:.2} Tf 1 0 0 1 {x:.2} {y:.2} Tm ({}) Tj",
            escape_literal(&span.text)
        ));
    }
    ops.push_str(" ET");
    ops
}

/// Escape a PDF literal string.
fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' | '\t' => out.push(' '),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}
