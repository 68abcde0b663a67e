pub mod config;
pub mod document;
pub mod enhance;
pub mod error;
pub mod flatten;
pub mod geometry;
pub mod history;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod tool;
