use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pdf_redactor::config;
use pdf_redactor::config::job::JobFile;
use pdf_redactor::config::merged::MergedConfig;
use pdf_redactor::document::Document;
use pdf_redactor::enhance::select_enhancer;
use pdf_redactor::geometry::SourceRect;
use pdf_redactor::history::{Edit, EditHistory};
use pdf_redactor::ocr::{TesseractOcr, TextRecognizer};
use pdf_redactor::pipeline::{CancelToken, export_document};
use pdf_redactor::render::pdfium::rasterize_document;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: pdf_redactor <jobs.yaml>...");
        eprintln!("  Rasterize, redact and flatten PDF files according to job specifications.");
        eprintln!("  --list-langs  print the installed OCR languages and exit");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_redactor {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--list-langs") {
        return match TesseractOcr::available_languages() {
            Ok(langs) => {
                for lang in langs {
                    println!("{lang}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("ERROR: Failed to list OCR languages: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let mut has_error = false;

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                has_error = true;
                continue;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                has_error = true;
                continue;
            }
        };

        let job_file: JobFile = match serde_yml::from_str(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                has_error = true;
                continue;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        // One job failure does not prevent other jobs from running.
        for job in &job_file.jobs {
            let merged = MergedConfig::new(&settings, job);
            let input_path = resolve_path(&job_dir, &job.input);
            let output_path = resolve_path(&job_dir, &job.output);

            match run_job(job, &merged, &input_path, &output_path) {
                Ok(pages) => {
                    eprintln!(
                        "OK: {} -> {} ({} pages)",
                        input_path.display(),
                        output_path.display(),
                        pages
                    );
                }
                Err(e) => {
                    eprintln!(
                        "ERROR: {} -> {}: {e}",
                        input_path.display(),
                        output_path.display()
                    );
                    has_error = true;
                }
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_job(
    job: &pdf_redactor::config::job::Job,
    merged: &MergedConfig,
    input_path: &Path,
    output_path: &Path,
) -> pdf_redactor::error::Result<usize> {
    let rasters = rasterize_document(input_path, merged.dpi)?;
    let mut document = Document::from_rasters(rasters);
    let mut history = EditHistory::new();

    // Job defaults from settings become recorded edits, so the export
    // pipeline only ever reads page state.
    if !merged.enhancement.is_noop() {
        for page in 0..document.page_count() {
            let edit = Edit::set_enhancement(&document, page, merged.enhancement)?;
            history.record(&mut document, edit)?;
        }
    }

    for redaction in &job.redactions {
        if redaction.page == 0 || redaction.page as usize > document.page_count() {
            return Err(pdf_redactor::error::RedactError::geometry(format!(
                "redaction page {} out of range (document has {} pages)",
                redaction.page,
                document.page_count()
            )));
        }
        let page = redaction.page as usize - 1;
        let rect = SourceRect::new(
            (redaction.x, redaction.y),
            (redaction.x + redaction.width, redaction.y + redaction.height),
        );
        let edit = Edit::add_redaction(&mut document, page, rect, merged.fill_color)?;
        history.record(&mut document, edit)?;
    }

    let enhancer = select_enhancer();
    let recognizer: Option<Box<dyn TextRecognizer>> = if merged.ocr_enabled && TesseractOcr::probe()
    {
        Some(Box::new(TesseractOcr::new(merged.ocr_language.clone())))
    } else {
        None
    };

    let cancel = CancelToken::new();
    let report = export_document(
        &document,
        merged,
        enhancer.as_ref(),
        recognizer.as_deref(),
        &cancel,
        output_path,
    )?;
    Ok(report.pages_exported)
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
