//! Tesseract CLI adapter: raster in, positioned words out (TSV).

use std::process::Command;
use std::time::Duration;

use image::RgbaImage;
use tracing::debug;

use crate::geometry::PixelRect;
use crate::tool;

use super::{TextRecognizer, TextSpan};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const RUN_TIMEOUT: Duration = Duration::from_secs(120);

/// TSV rows at this level are individual words.
const WORD_LEVEL: u32 = 5;

pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(language: impl Into<String>) -> Self {
        Self::with_binary("tesseract", language)
    }

    /// Use a specific binary name or path instead of `tesseract` on `PATH`.
    pub fn with_binary(binary: impl Into<String>, language: impl Into<String>) -> Self {
        TesseractOcr {
            binary: binary.into(),
            language: language.into(),
        }
    }

    /// Whether the tesseract binary is present and responsive.
    pub fn probe() -> bool {
        tool::probe("tesseract", "--version", PROBE_TIMEOUT)
    }

    /// Installed recognition languages, sorted (for the language picker).
    pub fn available_languages() -> crate::error::Result<Vec<String>> {
        let mut cmd = Command::new("tesseract");
        cmd.arg("--list-langs");
        let out = tool::run_with_timeout(cmd, PROBE_TIMEOUT)
            .map_err(|e| crate::error::RedactError::ocr(e.to_string()))?;
        if !out.success() {
            return Err(crate::error::RedactError::ocr(format!(
                "tesseract --list-langs exited with {}",
                out.status
            )));
        }
        let text = String::from_utf8_lossy(&out.stdout);
        // First line is a "List of available languages" header.
        let mut langs: Vec<String> = text
            .lines()
            .skip(1)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();
        langs.sort();
        Ok(langs)
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&self, raster: &RgbaImage) -> crate::error::Result<Vec<TextSpan>> {
        let dir = tempfile::tempdir()
            .map_err(|e| crate::error::RedactError::ocr(e.to_string()))?;
        let input = dir.path().join("page.png");
        raster
            .save(&input)
            .map_err(|e| crate::error::RedactError::ocr(e.to_string()))?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(&input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("tsv");

        let out = tool::run_with_timeout(cmd, RUN_TIMEOUT)
            .map_err(|e| crate::error::RedactError::ocr(e.to_string()))?;
        if !out.success() {
            return Err(crate::error::RedactError::ocr(format!(
                "{} exited with {}",
                self.binary, out.status
            )));
        }

        let spans = parse_tsv(&String::from_utf8_lossy(&out.stdout));
        debug!(words = spans.len(), "tesseract recognition complete");
        Ok(spans)
    }
}

/// Parse tesseract TSV output, keeping confident word-level rows.
///
/// Columns: level, page_num, block_num, par_num, line_num, word_num, left,
/// top, width, height, conf, text.
fn parse_tsv(tsv: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }
        let level: u32 = match fields[0].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        if level != WORD_LEVEL {
            continue;
        }
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        if conf < 0.0 {
            continue;
        }
        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }
        let (Ok(x), Ok(y), Ok(width), Ok(height)) = (
            fields[6].parse::<u32>(),
            fields[7].parse::<u32>(),
            fields[8].parse::<u32>(),
            fields[9].parse::<u32>(),
        ) else {
            continue;
        };
        if width == 0 || height == 0 {
            continue;
        }
        spans.push(TextSpan {
            text: text.to_owned(),
            bounds: PixelRect {
                x,
                y,
                width,
                height,
            },
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tsv_keeps_word_rows_only() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   1\t1\t0\t0\t0\t0\t0\t0\t1000\t1400\t-1\t\n\
                   5\t1\t1\t1\t1\t1\t100\t200\t80\t20\t96.5\thello\n\
                   5\t1\t1\t1\t1\t2\t190\t200\t90\t20\t91.0\tworld\n\
                   5\t1\t1\t1\t1\t3\t290\t200\t10\t20\t-1\t \n";
        let spans = parse_tsv(tsv);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "hello");
        assert_eq!(
            spans[0].bounds,
            PixelRect {
                x: 100,
                y: 200,
                width: 80,
                height: 20
            }
        );
        assert_eq!(spans[1].text, "world");
    }

    #[test]
    fn parse_tsv_skips_malformed_rows() {
        let spans = parse_tsv("header\n5\t1\t1\n5\t1\t1\t1\t1\t1\tx\ty\tw\th\t90\tword\n");
        assert!(spans.is_empty());
    }

    #[test]
    fn recognize_reports_missing_binary_as_ocr_unavailable() {
        let ocr = TesseractOcr::with_binary("tesseract-binary-that-does-not-exist", "eng");
        let raster = RgbaImage::new(8, 8);
        let err = ocr.recognize(&raster).expect_err("binary cannot be spawned");
        assert!(
            matches!(err, crate::error::RedactError::OcrUnavailable(_)),
            "wrong error kind: {err:?}"
        );
    }
}
