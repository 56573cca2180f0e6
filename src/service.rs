//! Report card generation orchestration.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info, warn};

use crate::aggregate;
use crate::config::ReportConfig;
use crate::error::{AppError, Result};
use crate::export;
use crate::layout::ReportCardLayout;
use crate::models::{Eligibility, GenerationResult, ReportCardDocument, ReportPreview};
use crate::render::render_pdf;
use crate::source::{ReportSource, fetch_report_data};
use crate::validate::{check_marks_available, validate_document};

const ELIGIBILITY_UNKNOWN: &str = "Unable to check eligibility. Please try again later.";

/// A rendered report card, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub document: ReportCardDocument,
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Where a generated report is saved.
#[derive(Debug, Clone)]
pub enum Destination {
    /// Write into this directory under the generated file name.
    Directory(PathBuf),
    /// Ask the user with a native save dialog.
    Dialog,
}

/// Report card service for one student's data source.
pub struct ReportCardService<S> {
    source: S,
    institution: String,
}

impl<S: ReportSource> ReportCardService<S> {
    /// Create a new report card service.
    pub fn new(source: S, config: &ReportConfig) -> Self {
        Self {
            source,
            institution: config.institution_name.clone(),
        }
    }

    /// Whether the student has any marks at all.
    pub async fn check_eligibility(&self) -> Eligibility {
        match self.source.marks().await {
            Ok(marks) => {
                let check = check_marks_available(&marks);
                Eligibility {
                    eligible: check.is_valid,
                    message: check.message,
                }
            }
            Err(e) => {
                error!("Failed to check report card eligibility: {e}");
                Eligibility {
                    eligible: false,
                    message: Some(ELIGIBILITY_UNKNOWN.to_string()),
                }
            }
        }
    }

    /// Fetch everything and assemble the document.
    pub async fn build_document(&self) -> Result<ReportCardDocument> {
        let data = fetch_report_data(&self.source).await?;
        Ok(aggregate::assemble(&data, &self.institution, Local::now().naive_local()))
    }

    /// Headline numbers without rendering.
    pub async fn preview(&self) -> Result<ReportPreview> {
        let doc = self.build_document().await?;
        Ok(ReportPreview::from(&doc))
    }

    /// Run the full pipeline: sufficiency check, fetch, validate, lay out, render.
    pub async fn generate(&self) -> Result<GeneratedReport> {
        info!("Starting report card generation");

        let marks = self
            .source
            .marks()
            .await
            .map_err(|e| AppError::data_unavailable(format!("failed to fetch marks: {e}")))?;
        if !check_marks_available(&marks).is_valid {
            return Err(AppError::NoMarks);
        }

        let document = self.build_document().await?;

        let report = validate_document(&document);
        if !report.is_valid {
            error!("Report card data validation failed: {:?}", report.errors);
            return Err(AppError::ValidationFailed { errors: report.errors });
        }

        self.render(document)
    }

    /// Lay out and render an assembled document.
    pub fn render(&self, document: ReportCardDocument) -> Result<GeneratedReport> {
        let laid_out = ReportCardLayout::new(self.institution.as_str())
            .and_then(|layout| layout.layout(&document))
            .map_err(|e| {
                error!("Report card layout failed: {e}");
                AppError::from(e)
            })?;

        let title = format!("Report Card - {}", document.student.name);
        let bytes = render_pdf(&laid_out, &title).map_err(|e| {
            error!("PDF rendering failed: {e}");
            AppError::from(e)
        })?;

        let file_name = export::report_file_name(
            &document.student.student_id,
            &document.period.semester,
            &document.period.academic_year,
        );
        info!(
            "Report card rendered: {file_name} ({} pages, {} bytes)",
            laid_out.page_count(),
            bytes.len()
        );

        Ok(GeneratedReport {
            document,
            file_name,
            page_count: laid_out.page_count(),
            bytes,
        })
    }

    /// Generate, save, and report the outcome as a caller-facing result.
    pub async fn generate_and_save(&self, destination: &Destination, spreadsheet: bool) -> GenerationResult {
        let report = match self.generate().await {
            Ok(report) => report,
            Err(e) => return failure(e),
        };

        let path = match destination {
            Destination::Directory(dir) => dir.join(&report.file_name),
            Destination::Dialog => match export::show_save_dialog(&report.file_name) {
                Some(path) => path,
                None => {
                    info!("Save dialog cancelled");
                    return GenerationResult::failed("Save cancelled.", None);
                }
            },
        };

        save_result(&report, &path, spreadsheet)
    }
}

/// Save and report the name of the file actually written.
fn save_result(report: &GeneratedReport, path: &Path, spreadsheet: bool) -> GenerationResult {
    if let Err(e) = save(report, path, spreadsheet) {
        return failure(e);
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| report.file_name.clone(), str::to_string);
    GenerationResult::ok(file_name)
}

/// Write the PDF to `path`, and the spreadsheet beside it when asked.
pub fn save(report: &GeneratedReport, path: &Path, spreadsheet: bool) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&report.file_name);

    let written = export::write_report(dir, file_name, &report.bytes)?;
    info!("Report card saved to {}", written.display());

    if spreadsheet {
        let xlsx = dir.join(export::spreadsheet_file_name(file_name));
        match export::export_report_card_to_excel(&report.document, &xlsx) {
            Ok(()) => info!("Spreadsheet saved to {}", xlsx.display()),
            // Non-fatal, the PDF is already written.
            Err(e) => warn!("Spreadsheet export failed: {e}"),
        }
    }

    Ok(())
}

fn failure(e: AppError) -> GenerationResult {
    if e.is_user_recoverable() {
        warn!("Report card not generated: {e}");
    } else {
        error!("Failed to generate report card: {e}");
    }

    match e {
        AppError::ValidationFailed { errors } => {
            GenerationResult::failed("Report card data is incomplete or invalid.", Some(errors))
        }
        other => GenerationResult::failed(other.user_message(), None),
    }
}
