//! Data source abstraction and the concurrent fetch phase.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::{Course, MarkRecord, StudentProfile};

/// Read-only source of the data a report card is built from.
pub trait ReportSource {
    fn profile(&self) -> impl Future<Output = Result<StudentProfile>>;
    fn courses(&self) -> impl Future<Output = Result<Vec<Course>>>;
    fn marks(&self) -> impl Future<Output = Result<Vec<MarkRecord>>>;
    /// Precomputed GPA, if the portal offers one.
    fn gpa(&self) -> impl Future<Output = Result<f64>>;
    /// Precomputed credit total, if the portal offers one.
    fn total_credits(&self) -> impl Future<Output = Result<f64>>;
}

/// Everything fetched for one generation request.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub profile: StudentProfile,
    pub courses: Vec<Course>,
    pub marks: Vec<MarkRecord>,
    pub gpa: Option<f64>,
    pub total_credits: Option<f64>,
}

/// Fetch all report data concurrently.
///
/// Profile, courses and marks are required; the first failure among them
/// fails the whole fetch. GPA and credits degrade to `None`.
pub async fn fetch_report_data<S: ReportSource>(source: &S) -> Result<ReportData> {
    let (profile, courses, marks, gpa, total_credits) = tokio::join!(
        source.profile(),
        source.courses(),
        source.marks(),
        source.gpa(),
        source.total_credits(),
    );

    let profile = profile.map_err(|e| required("student profile", e))?;
    let courses = courses.map_err(|e| required("courses", e))?;
    let marks = marks.map_err(|e| required("marks", e))?;

    let gpa = optional("GPA", gpa);
    let total_credits = optional("total credits", total_credits);

    debug!(
        "Fetched {} courses and {} mark records for {}",
        courses.len(),
        marks.len(),
        profile.student_id
    );

    Ok(ReportData {
        profile,
        courses,
        marks,
        gpa,
        total_credits,
    })
}

fn required(what: &str, e: AppError) -> AppError {
    match e {
        AppError::DataUnavailable(_) => e,
        other => AppError::data_unavailable(format!("failed to fetch {what}: {other}")),
    }
}

fn optional<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{what} not available: {e}");
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_fetch_all_data() {
        let mut source = scenario_a();
        source.gpa = Some(3.5);
        source.total_credits = Some(4.0);

        let data = fetch_report_data(&source).await.unwrap();
        assert_eq!(data.marks.len(), 2);
        assert_eq!(data.gpa, Some(3.5));
        assert_eq!(data.total_credits, Some(4.0));
    }

    #[tokio::test]
    async fn test_optional_fetch_failures_degrade_to_none() {
        let source = scenario_a();
        let data = fetch_report_data(&source).await.unwrap();
        assert!(data.gpa.is_none());
        assert!(data.total_credits.is_none());
    }

    #[tokio::test]
    async fn test_required_fetch_failure_is_data_unavailable() {
        let mut source = scenario_a();
        source.courses = None;

        let err = fetch_report_data(&source).await.unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(ref msg) if msg.contains("courses")));
    }
}
