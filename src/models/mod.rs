//! Data models: portal DTOs and report card values.

pub mod portal;
pub mod report;

pub use portal::{Course, ExamType, MarkRecord, StudentProfile};
pub use report::{
    AcademicPeriod, Assessment, Eligibility, GenerationResult, ReportCardDocument, ReportPreview, StudentInfo,
    Subject, Summary,
};
