//! Report card values: the assembled document and the caller-facing results.

use chrono::NaiveDate;
use serde::Serialize;

use super::portal::ExamType;

/// One graded assessment within a subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub exam_type: ExamType,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub exam_date: Option<NaiveDate>,
    /// Derived from marks, never read back as a source of truth.
    pub percentage: f64,
    pub grade: &'static str,
}

/// Per-course aggregate of a student's assessments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub course_code: String,
    pub course_name: String,
    pub credits: u32,
    pub assessments: Vec<Assessment>,
    pub overall_percentage: f64,
    pub overall_grade: &'static str,
    pub total_marks_obtained: f64,
    pub total_max_marks: f64,
}

/// Student identity block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub name: String,
    pub student_id: String,
    pub class_name: String,
    pub department: String,
    pub email: String,
}

/// Reporting period, computed once at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicPeriod {
    pub semester: String,
    pub academic_year: String,
    pub generated_date: String,
    pub generated_time: String,
}

/// Roll-up over all subjects.
///
/// `average_percentage` is the simple mean of subject percentages while
/// `overall_percentage` is marks-weighted. Both are reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_subjects: usize,
    pub average_percentage: f64,
    pub overall_grade: &'static str,
    pub gpa: Option<f64>,
    pub total_credits: Option<f64>,
    pub total_marks_obtained: f64,
    pub total_max_marks: f64,
    pub overall_percentage: f64,
}

/// The render-ready report card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardDocument {
    pub student: StudentInfo,
    pub period: AcademicPeriod,
    /// Sorted by course code.
    pub subjects: Vec<Subject>,
    pub summary: Summary,
}

/// Outcome reported back to the caller after a generation attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl GenerationResult {
    pub fn ok(file_name: String) -> Self {
        Self {
            success: true,
            message: "Report card downloaded successfully!".to_string(),
            file_name: Some(file_name),
            errors: None,
        }
    }

    pub fn failed(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file_name: None,
            errors,
        }
    }
}

/// Whether a report card can be generated right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Eligibility {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Headline numbers shown before generating the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPreview {
    pub student_name: String,
    pub student_id: String,
    pub total_subjects: usize,
    pub average_percentage: f64,
    pub overall_grade: &'static str,
    pub gpa: Option<f64>,
    pub total_credits: Option<f64>,
    pub academic_year: String,
    pub semester: String,
}

impl From<&ReportCardDocument> for ReportPreview {
    fn from(doc: &ReportCardDocument) -> Self {
        Self {
            student_name: doc.student.name.clone(),
            student_id: doc.student.student_id.clone(),
            total_subjects: doc.summary.total_subjects,
            average_percentage: doc.summary.average_percentage,
            overall_grade: doc.summary.overall_grade,
            gpa: doc.summary.gpa,
            total_credits: doc.summary.total_credits,
            academic_year: doc.period.academic_year.clone(),
            semester: doc.period.semester.clone(),
        }
    }
}
