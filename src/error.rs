use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedactError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Rasterization failure: {0}")]
    RasterizationFailure(String),

    #[error("Enhancement tool unavailable: {0}")]
    EnhancementToolUnavailable(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("PDF write error: {0}")]
    PdfWriteError(String),

    #[error("Export cancelled")]
    ExportCancelled,

    #[error("Export I/O failure: {0}")]
    ExportIoFailure(#[from] std::io::Error),
}

/// Generates factory methods for [`RedactError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl RedactError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create an invalid geometry error.
    geometry => InvalidGeometry,
    /// Create a rasterization failure.
    rasterization => RasterizationFailure,
    /// Create an enhancement tool error (recovered internally via fallback).
    enhancement_tool => EnhancementToolUnavailable,
    /// Create an OCR unavailability error (recovered by omitting the text layer).
    ocr => OcrUnavailable,
    /// Create a PDF write error.
    pdf_write => PdfWriteError,
}

impl From<lopdf::Error> for RedactError {
    fn from(e: lopdf::Error) -> Self {
        Self::PdfWriteError(e.to_string())
    }
}

impl From<serde_yml::Error> for RedactError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<image::ImageError> for RedactError {
    fn from(e: image::ImageError) -> Self {
        Self::PdfWriteError(e.to_string())
    }
}

#[cfg(feature = "render")]
impl From<pdfium_render::prelude::PdfiumError> for RedactError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RasterizationFailure(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RedactError>;
