pub mod writer;

pub use writer::PdfWriter;
