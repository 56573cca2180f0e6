//! Report file naming, saving, and spreadsheet export.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};

use crate::grades::{format_gpa, format_marks};
use crate::models::ReportCardDocument;

/// Deterministic report card file name.
///
/// The student id keeps only ASCII letters and digits, the semester loses
/// all whitespace, and the year keeps only digits and hyphens.
pub fn report_file_name(student_id: &str, semester: &str, academic_year: &str) -> String {
    let id: String = student_id.chars().filter(char::is_ascii_alphanumeric).collect();
    let semester: String = semester.chars().filter(|c| !c.is_whitespace()).collect();
    let year: String = academic_year
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    format!("ReportCard_{id}_{semester}_{year}.pdf")
}

/// Spreadsheet name next to a report file name.
pub fn spreadsheet_file_name(report_file_name: &str) -> String {
    let stem = report_file_name.strip_suffix(".pdf").unwrap_or(report_file_name);
    format!("{stem}.xlsx")
}

/// Write report bytes into `dir`, creating it if needed.
pub fn write_report(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("PDF Files", &["pdf"])
        .save_file()
}

/// Export a report card to Excel: one row per assessment, then a summary block.
pub fn export_report_card_to_excel(doc: &ReportCardDocument, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Report Card")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x2563EB))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let percent_format = Format::new().set_num_format("0.00");
    let label_format = Format::new().set_bold();

    let headers = [
        "Subject Code",
        "Subject Name",
        "Credits",
        "Assessment",
        "Date",
        "Marks Obtained",
        "Max Marks",
        "Percentage",
        "Grade",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    // Column widths
    worksheet.set_column_width(0, 14)?; // Subject Code
    worksheet.set_column_width(1, 32)?; // Subject Name
    worksheet.set_column_width(2, 8)?; // Credits
    worksheet.set_column_width(3, 14)?; // Assessment
    worksheet.set_column_width(4, 12)?; // Date
    worksheet.set_column_width(5, 15)?; // Marks Obtained
    worksheet.set_column_width(6, 10)?; // Max Marks
    worksheet.set_column_width(7, 12)?; // Percentage
    worksheet.set_column_width(8, 8)?; // Grade

    let mut row: u32 = 1;
    for subject in &doc.subjects {
        for assessment in &subject.assessments {
            worksheet.write_string(row, 0, &subject.course_code)?;
            worksheet.write_string(row, 1, &subject.course_name)?;
            worksheet.write_number(row, 2, f64::from(subject.credits))?;
            worksheet.write_string(row, 3, assessment.exam_type.as_str())?;
            match assessment.exam_date {
                Some(date) => worksheet.write_string(row, 4, date.to_string())?,
                None => worksheet.write_string(row, 4, "")?,
            };
            worksheet.write_number(row, 5, assessment.marks_obtained)?;
            worksheet.write_number(row, 6, assessment.max_marks)?;
            worksheet.write_number_with_format(row, 7, assessment.percentage, &percent_format)?;
            worksheet.write_string(row, 8, assessment.grade)?;
            row += 1;
        }
    }

    // Autofilter over the assessment rows only
    if row > 1 {
        worksheet.autofilter(0, 0, row - 1, 8)?;
    }

    // Summary block
    let summary = &doc.summary;
    row += 1;
    let lines: [(&str, String); 8] = [
        ("Student", format!("{} ({})", doc.student.name, doc.student.student_id)),
        ("Academic Year", doc.period.academic_year.clone()),
        ("Semester", doc.period.semester.clone()),
        ("Total Subjects", summary.total_subjects.to_string()),
        (
            "Total Marks",
            format!(
                "{} / {}",
                format_marks(summary.total_marks_obtained),
                format_marks(summary.total_max_marks)
            ),
        ),
        ("Average Percentage", format!("{:.2}%", summary.average_percentage)),
        ("Overall Grade", summary.overall_grade.to_string()),
        ("GPA", summary.gpa.map(format_gpa).unwrap_or_else(|| "N/A".to_string())),
    ];

    for (label, value) in &lines {
        worksheet.write_string_with_format(row, 0, *label, &label_format)?;
        worksheet.write_string(row, 1, value)?;
        row += 1;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}
