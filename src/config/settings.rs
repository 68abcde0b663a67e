use std::path::Path;

use serde::Deserialize;

use crate::document::EnhancementSettings;
use crate::document::region::FillColor;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target rasterization/export resolution.
    pub dpi: u32,
    /// JPEG quality for exported page images (1-100).
    pub jpeg_quality: u8,
    /// Marker fill color for new redaction regions.
    pub fill_color: FillColor,
    /// Upscale standard-ratio crops to canonical page dimensions.
    pub smart_upscale: bool,
    pub ocr_enabled: bool,
    pub ocr_language: String,
    /// Default enhancement applied to pages that have no explicit
    /// enhancement edit.
    pub enhancement: EnhancementSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dpi: 300,
            jpeg_quality: 85,
            fill_color: FillColor::Black,
            smart_upscale: true,
            ocr_enabled: true,
            ocr_language: "eng".to_string(),
            enhancement: EnhancementSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let settings: Settings = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::RedactError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.dpi == 0 {
            return Err(crate::error::RedactError::config("dpi must be positive"));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(crate::error::RedactError::config(format!(
                "jpeg_quality {} out of range 1-100",
                self.jpeg_quality
            )));
        }
        if self.ocr_language.is_empty() {
            return Err(crate::error::RedactError::config(
                "ocr_language cannot be empty",
            ));
        }
        Ok(())
    }
}
