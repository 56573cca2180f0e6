//! End-to-end report card pipeline against an in-memory portal.

use std::path::PathBuf;

use report_card::config::ReportConfig;
use report_card::error::{AppError, Result};
use report_card::export::report_file_name;
use report_card::grades;
use report_card::layout::{BlockKind, PageGeometry, ReportCardLayout};
use report_card::models::{Course, ExamType, MarkRecord, StudentProfile};
use report_card::service::{Destination, ReportCardService};
use report_card::source::ReportSource;

#[derive(Clone, Default)]
struct FakePortal {
    courses: Vec<Course>,
    marks: Vec<MarkRecord>,
    gpa: Option<f64>,
    credits: Option<f64>,
}

impl ReportSource for FakePortal {
    async fn profile(&self) -> Result<StudentProfile> {
        Ok(StudentProfile {
            id: 7,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            student_id: "STU-2024/007".to_string(),
            class_name: None,
            email: None,
        })
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        Ok(self.courses.clone())
    }

    async fn marks(&self) -> Result<Vec<MarkRecord>> {
        Ok(self.marks.clone())
    }

    async fn gpa(&self) -> Result<f64> {
        self.gpa.ok_or_else(|| AppError::parse("gpa unavailable"))
    }

    async fn total_credits(&self) -> Result<f64> {
        self.credits.ok_or_else(|| AppError::parse("credits unavailable"))
    }
}

fn course(id: i64, code: &str, credits: u32) -> Course {
    Course {
        id,
        course_code: code.to_string(),
        course_name: format!("Course {code}"),
        credits,
    }
}

fn mark(course_id: i64, exam_type: ExamType, obtained: f64, max: f64) -> MarkRecord {
    MarkRecord {
        course_id,
        exam_type,
        marks_obtained: obtained,
        max_marks: max,
        exam_date: None,
    }
}

fn config() -> ReportConfig {
    ReportConfig {
        institution_name: "Test Academy".to_string(),
        output_dir: PathBuf::from("reports"),
        export_spreadsheet: false,
    }
}

#[tokio::test]
async fn test_scenario_a_single_course() {
    let portal = FakePortal {
        courses: vec![course(1, "MATH101", 4)],
        marks: vec![
            mark(1, ExamType::Midterm, 80.0, 100.0),
            mark(1, ExamType::Final, 90.0, 100.0),
        ],
        ..Default::default()
    };
    let service = ReportCardService::new(portal, &config());

    let report = service.generate().await.unwrap();
    let doc = &report.document;

    assert_eq!(doc.subjects.len(), 1);
    assert_eq!(doc.subjects[0].overall_percentage, 85.0);
    assert_eq!(doc.subjects[0].overall_grade, "A");
    assert_eq!(doc.summary.total_subjects, 1);
    assert_eq!(doc.summary.average_percentage, 85.0);
    assert_eq!(doc.summary.overall_percentage, 85.0);
    assert_eq!(doc.summary.gpa, None);
    assert_eq!(doc.student.class_name, "N/A");
    assert!(report.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_scenario_b_no_marks() {
    let portal = FakePortal {
        courses: vec![course(1, "MATH101", 4)],
        ..Default::default()
    };
    let service = ReportCardService::new(portal, &config());

    let eligibility = service.check_eligibility().await;
    assert!(!eligibility.eligible);
    assert!(eligibility.message.unwrap().starts_with("No marks available"));

    let dir = std::env::temp_dir().join(format!("report-card-b-{}", std::process::id()));
    let result = service.generate_and_save(&Destination::Directory(dir.clone()), false).await;
    assert!(!result.success);
    assert!(result.message.starts_with("No marks available"));
    assert!(result.file_name.is_none());
    assert!(!dir.exists());
}

#[tokio::test]
async fn test_scenario_c_credit_weighting() {
    let portal = FakePortal {
        courses: vec![course(1, "CS101", 3), course(2, "HIST200", 5)],
        marks: vec![
            mark(1, ExamType::Final, 100.0, 100.0),
            mark(2, ExamType::Final, 40.0, 100.0),
        ],
        ..Default::default()
    };
    let service = ReportCardService::new(portal, &config());
    let doc = service.build_document().await.unwrap();

    let percentages: Vec<f64> = doc.subjects.iter().map(|s| s.overall_percentage).collect();
    let credits: Vec<f64> = doc.subjects.iter().map(|s| f64::from(s.credits)).collect();

    assert_eq!(grades::gpa(&percentages, Some(&credits)), 1.5);
    assert_eq!(grades::gpa(&percentages, None), 2.0);

    // 50% sits in the 1.7 bucket of the points table
    let with_fifty = [100.0, 50.0];
    assert!((grades::gpa(&with_fifty, Some(&credits)) - 2.5625).abs() < 1e-9);
    assert!((grades::gpa(&with_fifty, None) - 2.85).abs() < 1e-9);
}

#[tokio::test]
async fn test_portal_gpa_passes_through() {
    let portal = FakePortal {
        courses: vec![course(1, "CS101", 3)],
        marks: vec![mark(1, ExamType::Quiz, 5.0, 10.0)],
        gpa: Some(3.25),
        credits: Some(18.0),
    };
    let service = ReportCardService::new(portal, &config());
    let preview = service.preview().await.unwrap();

    assert_eq!(preview.gpa, Some(3.25));
    assert_eq!(preview.total_credits, Some(18.0));
    assert_eq!(preview.overall_grade, "C-");
}

#[tokio::test]
async fn test_many_courses_paginate_without_overflow() {
    let courses: Vec<Course> = (1..=60).map(|i| course(i, &format!("C{i:03}"), 3)).collect();
    let marks: Vec<MarkRecord> = (1..=60)
        .flat_map(|i| {
            [
                mark(i, ExamType::Midterm, 70.0, 100.0),
                mark(i, ExamType::Final, 88.0, 100.0),
                mark(i, ExamType::Assignment, 18.0, 20.0),
            ]
        })
        .collect();
    let portal = FakePortal {
        courses,
        marks,
        ..Default::default()
    };
    let service = ReportCardService::new(portal, &config());
    let doc = service.build_document().await.unwrap();

    let laid_out = ReportCardLayout::new("Test Academy").unwrap().layout(&doc).unwrap();
    let geometry = PageGeometry::A4;
    let total = laid_out.page_count();
    assert!(total > 1);

    let mut rows = 0;
    for page in &laid_out.pages {
        for block in &page.blocks {
            assert!(block.top >= geometry.margin_top - 1e-3);
            assert!(block.bottom() <= geometry.content_bottom() + 1e-3);
        }
        for pair in page.blocks.windows(2) {
            assert!(pair[0].bottom() <= pair[1].top + 1e-3);
        }

        let page_rows = page.blocks.iter().filter(|b| matches!(b.kind, BlockKind::TableRow(_))).count();
        if page_rows > 0 {
            let header = page.blocks.iter().position(|b| b.kind == BlockKind::TableHeader);
            let first_row = page.blocks.iter().position(|b| matches!(b.kind, BlockKind::TableRow(_)));
            assert!(header.is_some() && header < first_row);
        }
        rows += page_rows;

        let stamp = format!("Page {} of {}", page.number, total);
        assert!(page.texts().any(|t| t == stamp));
    }
    assert_eq!(rows, 60);

    let last = &laid_out.pages[total - 1];
    assert!(last.blocks.iter().any(|b| b.kind == BlockKind::DocumentFooter));
}

#[tokio::test]
async fn test_generated_file_name() {
    let portal = FakePortal {
        courses: vec![course(1, "MATH101", 4)],
        marks: vec![mark(1, ExamType::Final, 90.0, 100.0)],
        ..Default::default()
    };
    let service = ReportCardService::new(portal, &config());
    let report = service.generate().await.unwrap();

    let period = &report.document.period;
    let expected = report_file_name("STU-2024/007", &period.semester, &period.academic_year);
    assert_eq!(report.file_name, expected);
    assert!(report.file_name.starts_with("ReportCard_STU2024007_"));
    assert_eq!(
        report_file_name("STU-2024/007", "Fall", "2024-2025"),
        "ReportCard_STU2024007_Fall_2024-2025.pdf"
    );
}
