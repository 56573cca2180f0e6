//! Aggregation of raw mark records into a report card document.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use tracing::warn;

use crate::grades::{self, NO_GRADE};
use crate::models::{
    AcademicPeriod, Assessment, Course, MarkRecord, ReportCardDocument, StudentInfo, StudentProfile, Subject, Summary,
};
use crate::source::ReportData;

/// Subjects built from one student's marks, plus the records left out.
#[derive(Debug, Clone, Default)]
pub struct SubjectAggregation {
    /// Sorted by course code (ordinal).
    pub subjects: Vec<Subject>,
    /// Records whose course is not in the enrolled set.
    pub dropped: Vec<DroppedRecords>,
}

/// Orphan marks for one unknown course id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRecords {
    pub course_id: i64,
    pub count: usize,
}

/// Group marks by course and build one subject per enrolled course that has marks.
pub fn aggregate_subjects(marks: &[MarkRecord], courses: &[Course]) -> SubjectAggregation {
    // BTreeMap keeps dropped ids in a stable order
    let mut by_course: BTreeMap<i64, Vec<&MarkRecord>> = BTreeMap::new();
    for mark in marks {
        by_course.entry(mark.course_id).or_default().push(mark);
    }

    let course_map: HashMap<i64, &Course> = courses.iter().map(|c| (c.id, c)).collect();

    let mut aggregation = SubjectAggregation::default();
    for (course_id, course_marks) in by_course {
        match course_map.get(&course_id) {
            Some(course) => aggregation.subjects.push(build_subject(course, &course_marks)),
            None => aggregation.dropped.push(DroppedRecords {
                course_id,
                count: course_marks.len(),
            }),
        }
    }

    aggregation
        .subjects
        .sort_by(|a, b| a.course_code.as_bytes().cmp(b.course_code.as_bytes()));
    aggregation
}

fn build_subject(course: &Course, marks: &[&MarkRecord]) -> Subject {
    let assessments: Vec<Assessment> = marks
        .iter()
        .map(|mark| {
            let percentage = grades::percentage(mark.marks_obtained, mark.max_marks);
            Assessment {
                exam_type: mark.exam_type.clone(),
                marks_obtained: mark.marks_obtained,
                max_marks: mark.max_marks,
                exam_date: mark.exam_date,
                percentage,
                grade: grades::letter_grade(percentage),
            }
        })
        .collect();

    let total_marks_obtained: f64 = assessments.iter().map(|a| a.marks_obtained).sum();
    let total_max_marks: f64 = assessments.iter().map(|a| a.max_marks).sum();
    let overall_percentage = if total_max_marks > 0.0 {
        total_marks_obtained / total_max_marks * 100.0
    } else {
        0.0
    };

    Subject {
        course_code: course.course_code.clone(),
        course_name: course.course_name.clone(),
        credits: course.credits,
        assessments,
        overall_percentage,
        overall_grade: grades::letter_grade(overall_percentage),
        total_marks_obtained,
        total_max_marks,
    }
}

/// Academic period for a moment in time.
///
/// August onwards is Fall of `y-(y+1)`; January to May is Spring of
/// `(y-1)-y`; June and July are Summer of `(y-1)-y`.
pub fn academic_period(now: NaiveDateTime) -> AcademicPeriod {
    let year = now.year();
    let (semester, academic_year) = match now.month() {
        8..=12 => ("Fall", format!("{year}-{}", year + 1)),
        1..=5 => ("Spring", format!("{}-{year}", year - 1)),
        _ => ("Summer", format!("{}-{year}", year - 1)),
    };

    AcademicPeriod {
        semester: semester.to_string(),
        academic_year,
        generated_date: now.format("%B %-d, %Y").to_string(),
        generated_time: now.format("%I:%M %p").to_string(),
    }
}

/// Student identity block from the portal profile.
pub fn student_info(profile: &StudentProfile, department: &str) -> StudentInfo {
    let class_name = profile
        .class_name
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("N/A");

    StudentInfo {
        name: profile.full_name(),
        student_id: profile.student_id.trim().to_string(),
        class_name: class_name.to_string(),
        department: department.to_string(),
        email: profile.email.clone().unwrap_or_default(),
    }
}

/// Roll-up over subjects. External GPA and credits pass through untouched.
pub fn summarize(subjects: &[Subject], gpa: Option<f64>, total_credits: Option<f64>) -> Summary {
    if subjects.is_empty() {
        return Summary {
            total_subjects: 0,
            average_percentage: 0.0,
            overall_grade: NO_GRADE,
            gpa,
            total_credits,
            total_marks_obtained: 0.0,
            total_max_marks: 0.0,
            overall_percentage: 0.0,
        };
    }

    let total_marks_obtained: f64 = subjects.iter().map(|s| s.total_marks_obtained).sum();
    let total_max_marks: f64 = subjects.iter().map(|s| s.total_max_marks).sum();
    let overall_percentage = if total_max_marks > 0.0 {
        total_marks_obtained / total_max_marks * 100.0
    } else {
        0.0
    };
    let average_percentage =
        subjects.iter().map(|s| s.overall_percentage).sum::<f64>() / subjects.len() as f64;

    Summary {
        total_subjects: subjects.len(),
        average_percentage,
        overall_grade: grades::letter_grade(average_percentage),
        gpa,
        total_credits,
        total_marks_obtained,
        total_max_marks,
        overall_percentage,
    }
}

/// Assemble the document from fetched data at a given moment.
pub fn assemble(data: &ReportData, department: &str, now: NaiveDateTime) -> ReportCardDocument {
    let aggregation = aggregate_subjects(&data.marks, &data.courses);
    for dropped in &aggregation.dropped {
        warn!(
            "Dropping {} mark record(s) for course {} not in enrolled courses",
            dropped.count, dropped.course_id
        );
    }

    let summary = summarize(&aggregation.subjects, data.gpa, data.total_credits);

    ReportCardDocument {
        student: student_info(&data.profile, department),
        period: academic_period(now),
        subjects: aggregation.subjects,
        summary,
    }
}
