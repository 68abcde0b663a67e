use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

/// One batch redaction job: input PDF, output path, and the redaction
/// rectangles to bake in, expressed in source-raster pixel coordinates at
/// the job's DPI.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub redactions: Vec<JobRedaction>,
    pub dpi: Option<u32>,
    pub jpeg_quality: Option<u8>,
    pub ocr_enabled: Option<bool>,
    pub ocr_language: Option<String>,
}

/// A redaction rectangle for one page (1-based page numbers).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct JobRedaction {
    pub page: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
