//! Sufficiency and structural checks run before rendering.

use serde::Serialize;

use crate::models::{MarkRecord, ReportCardDocument};

/// Message shown when a student has no marks at all.
pub const NO_MARKS_MESSAGE: &str = "No marks available. Please contact your instructor.";

/// Result of the pre-fetch sufficiency check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SufficiencyCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of the structural document check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Does the student have at least one assessment record?
pub fn check_marks_available(marks: &[MarkRecord]) -> SufficiencyCheck {
    if marks.is_empty() {
        SufficiencyCheck {
            is_valid: false,
            message: Some(NO_MARKS_MESSAGE.to_string()),
        }
    } else {
        SufficiencyCheck {
            is_valid: true,
            message: None,
        }
    }
}

/// Check an assembled document, collecting every violation.
pub fn validate_document(doc: &ReportCardDocument) -> ValidationReport {
    let mut errors = Vec::new();

    if doc.student.name.trim().is_empty() {
        errors.push("Student name is required".to_string());
    }
    if doc.student.student_id.trim().is_empty() {
        errors.push("Student ID is required".to_string());
    }
    if doc.subjects.is_empty() {
        errors.push("No subjects found for report card".to_string());
    }

    for (index, subject) in doc.subjects.iter().enumerate() {
        if subject.course_code.trim().is_empty() || subject.course_name.trim().is_empty() {
            errors.push(format!("Subject {} is missing course information", index + 1));
        }
        if subject.assessments.is_empty() {
            errors.push(format!("Subject {} has no assessments", subject.course_code));
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
