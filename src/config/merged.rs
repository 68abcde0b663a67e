use crate::document::EnhancementSettings;
use crate::document::region::FillColor;

use super::job::Job;
use super::settings::Settings;

/// Effective per-job configuration: job overrides win over settings.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub dpi: u32,
    pub jpeg_quality: u8,
    pub fill_color: FillColor,
    pub smart_upscale: bool,
    pub ocr_enabled: bool,
    pub ocr_language: String,
    pub enhancement: EnhancementSettings,
}

impl MergedConfig {
    pub fn new(settings: &Settings, job: &Job) -> Self {
        MergedConfig {
            dpi: job.dpi.unwrap_or(settings.dpi),
            jpeg_quality: job.jpeg_quality.unwrap_or(settings.jpeg_quality),
            fill_color: settings.fill_color,
            smart_upscale: settings.smart_upscale,
            ocr_enabled: job.ocr_enabled.unwrap_or(settings.ocr_enabled),
            ocr_language: job
                .ocr_language
                .clone()
                .unwrap_or_else(|| settings.ocr_language.clone()),
            enhancement: settings.enhancement,
        }
    }
}
