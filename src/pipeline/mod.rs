pub mod exporter;
pub mod page_processor;

pub use exporter::{CancelToken, ExportReport, export_document};
pub use page_processor::{ProcessedPage, process_page};
