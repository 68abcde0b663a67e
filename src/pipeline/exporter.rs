//! Whole-document export: fan pages out across workers, reassemble in
//! document order, write the output atomically.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::info;

use crate::config::merged::MergedConfig;
use crate::document::Document;
use crate::enhance::Enhancer;
use crate::error::RedactError;
use crate::ocr::TextRecognizer;
use crate::pdf::PdfWriter;
use crate::pipeline::page_processor::{ProcessedPage, process_page};

/// Cooperative cancellation flag for an in-flight export. Cancellation
/// abandons the export and discards all partial output; it never leaves a
/// partially-written file behind.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a successful export.
pub struct ExportReport {
    pub output_path: PathBuf,
    pub pages_exported: usize,
    /// Pages that got an OCR text layer.
    pub pages_with_text: usize,
}

/// Export the document to a flattened PDF at `output_path`.
///
/// Pages are processed in parallel (each page's pipeline depends only on its
/// own state) and reassembled in document order. Any page failure aborts the
/// whole export: a document with silently missing pages would look complete.
/// The output file appears atomically; on failure or cancellation the
/// destination path is left untouched.
///
/// The shared `&Document` borrow serializes exports against edits, which
/// require `&mut Document` through the history.
pub fn export_document(
    document: &Document,
    config: &MergedConfig,
    enhancer: &dyn Enhancer,
    recognizer: Option<&dyn TextRecognizer>,
    cancel: &CancelToken,
    output_path: &Path,
) -> crate::error::Result<ExportReport> {
    let recognizer = if config.ocr_enabled { recognizer } else { None };

    let mut processed: Vec<ProcessedPage> = document
        .pages()
        .par_iter()
        .enumerate()
        .map(|(index, page)| {
            if cancel.is_cancelled() {
                return Err(RedactError::ExportCancelled);
            }
            process_page(index, page, config, enhancer, recognizer)
        })
        .collect::<crate::error::Result<Vec<_>>>()?;

    if cancel.is_cancelled() {
        return Err(RedactError::ExportCancelled);
    }

    // Aggregation must preserve document order regardless of completion order.
    processed.sort_by_key(|p| p.page_index);

    let pages_with_text = processed.iter().filter(|p| !p.text.is_empty()).count();

    let mut writer = PdfWriter::new();
    for page in &processed {
        writer.add_page(&page.jpeg, page.width, page.height, config.dpi, &page.text)?;
    }
    let pdf_bytes = writer.save_to_bytes()?;

    write_atomically(output_path, &pdf_bytes)?;

    info!(
        output = %output_path.display(),
        pages = processed.len(),
        pages_with_text,
        "export complete"
    );
    Ok(ExportReport {
        output_path: output_path.to_path_buf(),
        pages_exported: processed.len(),
        pages_with_text,
    })
}

/// Write to a temporary file in the destination directory, then move it into
/// place. An existing file at `path` is only ever replaced by a complete
/// export.
fn write_atomically(path: &Path, bytes: &[u8]) -> crate::error::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| RedactError::from(e.error))?;
    Ok(())
}
