//! Report card sections: header, student details, performance table,
//! summary box and footers, always in that order.

use super::canvas::Canvas;
use super::style::{Rgb, Styles};
use super::table::{Column, Table};
use super::text::{centered_baseline, truncate};
use super::{Align, BlockKind, LaidOutDocument, LayoutError, PageGeometry, RectOp, TextOp, Weight};
use crate::grades::{format_gpa, format_marks, format_percentage};
use crate::models::{Assessment, ReportCardDocument, Subject};

/// Closing line of the document footer.
pub fn disclaimer(institution: &str) -> String {
    format!("This is an official academic document generated by the {institution} system.")
}

const PERFORMANCE_COLUMNS: [(&str, f32, Align); 6] = [
    ("Subject Code", 25.0, Align::Center),
    ("Subject Name", 50.0, Align::Left),
    ("Assessments", 45.0, Align::Left),
    ("Total Marks", 25.0, Align::Center),
    ("Percentage", 25.0, Align::Center),
    ("Grade", 20.0, Align::Center),
];

/// Lays out one report card. Consumed by [`ReportCardLayout::layout`], so an
/// instance never serves a second document.
pub struct ReportCardLayout {
    canvas: Canvas,
    styles: Styles,
    institution: String,
}

impl ReportCardLayout {
    /// A4 layout with the default styles.
    pub fn new(institution: impl Into<String>) -> Result<Self, LayoutError> {
        Self::with_geometry(PageGeometry::A4, Styles::default(), institution)
    }

    pub fn with_geometry(
        geometry: PageGeometry,
        styles: Styles,
        institution: impl Into<String>,
    ) -> Result<Self, LayoutError> {
        Ok(Self {
            canvas: Canvas::new(geometry)?,
            styles,
            institution: institution.into(),
        })
    }

    /// Lay out the full document, then stamp page footers.
    pub fn layout(mut self, doc: &ReportCardDocument) -> Result<LaidOutDocument, LayoutError> {
        self.add_header(doc)?;
        self.add_student_details(doc)?;
        self.add_performance_table(doc)?;
        self.add_summary(doc)?;
        self.add_document_footer(doc)?;
        self.stamp_page_footers();

        let geometry = *self.canvas.geometry();
        Ok(LaidOutDocument {
            geometry,
            pages: self.canvas.into_pages(),
        })
    }

    fn geometry(&self) -> PageGeometry {
        *self.canvas.geometry()
    }

    #[allow(clippy::too_many_arguments)]
    fn label(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, weight: Weight, color: Rgb, align: Align) {
        self.canvas.text(TextOp {
            text: text.into(),
            x,
            y,
            size,
            weight,
            color,
            align,
        });
    }

    fn add_header(&mut self, doc: &ReportCardDocument) -> Result<(), LayoutError> {
        let spacing = self.styles.spacing;
        let fonts = self.styles.fonts;
        let colors = self.styles.colors;
        let title_row = spacing.line + 2.0;
        let height = title_row + spacing.line * 2.0;

        self.canvas.ensure_space("header", height)?;
        let top = self.canvas.place(BlockKind::Header, height);
        let center = self.geometry().width / 2.0;

        let institution = self.institution.clone();
        self.label(
            institution,
            center,
            centered_baseline(top, title_row, fonts.title),
            fonts.title,
            Weight::Bold,
            colors.primary,
            Align::Center,
        );
        self.label(
            "Student Report Card",
            center,
            centered_baseline(top + title_row, spacing.line, fonts.heading),
            fonts.heading,
            Weight::Bold,
            colors.text,
            Align::Center,
        );
        self.label(
            format!("{} Semester {}", doc.period.semester, doc.period.academic_year),
            center,
            centered_baseline(top + title_row + spacing.line, spacing.line, fonts.body),
            fonts.body,
            Weight::Normal,
            colors.secondary,
            Align::Center,
        );

        self.canvas.advance(spacing.section / 2.0);
        Ok(())
    }

    fn add_student_details(&mut self, doc: &ReportCardDocument) -> Result<(), LayoutError> {
        let spacing = self.styles.spacing;
        let fonts = self.styles.fonts;
        let colors = self.styles.colors;
        let title_row = spacing.line + 2.0;

        let student = &doc.student;
        let left: Vec<(&str, &str)> = vec![
            ("Student Name:", student.name.as_str()),
            ("Student ID:", student.student_id.as_str()),
            ("Class:", student.class_name.as_str()),
        ];
        let mut right: Vec<(&str, &str)> = vec![
            ("Department:", student.department.as_str()),
            ("Generated:", doc.period.generated_date.as_str()),
        ];
        if !student.email.is_empty() {
            right.push(("Email:", student.email.as_str()));
        }
        let rows = left.len().max(right.len());
        let height = title_row + spacing.line * rows as f32;

        self.canvas.ensure_space("student details", height)?;
        let top = self.canvas.place(BlockKind::StudentInfo, height);
        let geometry = self.geometry();
        let left_x = geometry.margin_left;
        let center = geometry.width / 2.0;

        self.label(
            "Student Information",
            left_x,
            centered_baseline(top, title_row, fonts.subheading),
            fonts.subheading,
            Weight::Bold,
            colors.text,
            Align::Left,
        );

        let columns = [
            (left, left_x, 35.0, center - left_x - 35.0),
            (right, center, 30.0, geometry.width - geometry.margin_right - center - 30.0),
        ];
        for (pairs, x, value_offset, value_width) in columns {
            for (row, (key, value)) in pairs.into_iter().enumerate() {
                let y = centered_baseline(top + title_row + spacing.line * row as f32, spacing.line, fonts.body);
                self.label(key, x, y, fonts.body, Weight::Bold, colors.text, Align::Left);
                let value = truncate(value, value_width - 2.0, fonts.body, Weight::Normal);
                self.label(value, x + value_offset, y, fonts.body, Weight::Normal, colors.text, Align::Left);
            }
        }

        self.canvas.advance(spacing.section);
        Ok(())
    }

    fn add_performance_table(&mut self, doc: &ReportCardDocument) -> Result<(), LayoutError> {
        let spacing = self.styles.spacing;
        let fonts = self.styles.fonts;
        let title_height = spacing.line + 5.0;

        let columns: Vec<Column> = PERFORMANCE_COLUMNS
            .iter()
            .map(|(header, width, align)| Column::new(*header, *width, *align))
            .collect();
        let rows: Vec<Vec<String>> = doc.subjects.iter().map(subject_row).collect();
        let styles = self.styles;
        let table = Table {
            columns: &columns,
            rows: &rows,
            styles: &styles,
        };

        // Keep the section title with the header and first row when they fit
        // on one page. A taller first row is left to the table's own check.
        let geometry = self.geometry();
        let lead = table.lead_height(geometry.content_width());
        let lead_in = (title_height + lead).min(geometry.content_height());
        self.canvas.ensure_space("academic performance", lead_in)?;
        let top = self.canvas.place(BlockKind::SectionTitle, title_height);
        let x = self.geometry().margin_left;
        self.label(
            "Academic Performance",
            x,
            centered_baseline(top, title_height, fonts.subheading),
            fonts.subheading,
            Weight::Bold,
            self.styles.colors.text,
            Align::Left,
        );

        table.draw(&mut self.canvas)?;
        self.canvas.advance(spacing.section);
        Ok(())
    }

    fn add_summary(&mut self, doc: &ReportCardDocument) -> Result<(), LayoutError> {
        let spacing = self.styles.spacing;
        let fonts = self.styles.fonts;
        let colors = self.styles.colors;
        let title_height = spacing.line + 5.0;
        let box_height = spacing.summary_box;

        self.canvas.ensure_space("summary", title_height + box_height)?;
        let title_top = self.canvas.place(BlockKind::SectionTitle, title_height);
        let geometry = self.geometry();
        let left_x = geometry.margin_left;
        let center = geometry.width / 2.0;

        self.label(
            "Academic Summary",
            left_x,
            centered_baseline(title_top, title_height, fonts.subheading),
            fonts.subheading,
            Weight::Bold,
            colors.text,
            Align::Left,
        );

        let box_top = self.canvas.place(BlockKind::Summary, box_height);
        self.canvas.rect(RectOp {
            x: left_x,
            y: box_top,
            width: geometry.content_width(),
            height: box_height,
            fill: Some(colors.light_gray),
            stroke: Some(colors.border),
            line_width: 0.3,
        });

        let summary = &doc.summary;
        let left = vec![
            ("Total Subjects:", summary.total_subjects.to_string()),
            ("Average Percentage:", format_percentage(summary.average_percentage, 2)),
            ("Overall Grade:", summary.overall_grade.to_string()),
        ];
        let mut right = vec![
            (
                "Total Marks:",
                format!(
                    "{}/{}",
                    format_marks(summary.total_marks_obtained),
                    format_marks(summary.total_max_marks)
                ),
            ),
            ("Overall Percentage:", format_percentage(summary.overall_percentage, 2)),
        ];
        if let Some(gpa) = summary.gpa {
            right.push(("GPA:", format_gpa(gpa)));
        }
        if let Some(credits) = summary.total_credits {
            right.push(("Total Credits:", format_marks(credits)));
        }

        let first_row = box_top + 4.0;
        for (pairs, x) in [(left, left_x + 10.0), (right, center + 10.0)] {
            for (row, (key, value)) in pairs.into_iter().enumerate() {
                let y = centered_baseline(first_row + spacing.line * row as f32, spacing.line, fonts.body);
                self.label(key, x, y, fonts.body, Weight::Bold, colors.text, Align::Left);
                self.label(value, x + 45.0, y, fonts.body, Weight::Normal, colors.text, Align::Left);
            }
        }

        self.canvas.advance(spacing.section);
        Ok(())
    }

    /// Timestamp and disclaimer, pinned to the bottom of the last page's
    /// content area. Breaks to a new page when there is no room left.
    fn add_document_footer(&mut self, doc: &ReportCardDocument) -> Result<(), LayoutError> {
        let spacing = self.styles.spacing;
        let fonts = self.styles.fonts;
        let colors = self.styles.colors;
        let height = spacing.line * 2.0;

        self.canvas.ensure_space("document footer", height)?;
        let geometry = self.geometry();
        let top = self.canvas.state().y.max(geometry.content_bottom() - height);
        self.canvas.place_at(BlockKind::DocumentFooter, top, height);

        let center = geometry.width / 2.0;
        self.label(
            format!(
                "Generated on {} at {}",
                doc.period.generated_date, doc.period.generated_time
            ),
            center,
            centered_baseline(top, spacing.line, fonts.small),
            fonts.small,
            Weight::Normal,
            colors.secondary,
            Align::Center,
        );
        let disclaimer = disclaimer(&self.institution);
        self.label(
            disclaimer,
            center,
            centered_baseline(top + spacing.line, spacing.line, fonts.small),
            fonts.small,
            Weight::Normal,
            colors.secondary,
            Align::Center,
        );
        Ok(())
    }

    /// Second pass: the page count is final, stamp every page.
    fn stamp_page_footers(&mut self) {
        let geometry = self.geometry();
        let fonts = self.styles.fonts;
        let color = self.styles.colors.secondary;
        let generated_by = format!("Generated by {}", self.institution);

        let total = self.canvas.page_count();
        for page in self.canvas.pages_mut() {
            let y = geometry.footer_baseline();
            page.ops.push(super::DrawOp::Text(TextOp {
                text: generated_by.clone(),
                x: geometry.margin_left,
                y,
                size: fonts.small,
                weight: Weight::Normal,
                color,
                align: Align::Left,
            }));
            page.ops.push(super::DrawOp::Text(TextOp {
                text: format!("Page {} of {}", page.number, total),
                x: geometry.width - geometry.margin_right,
                y,
                size: fonts.small,
                weight: Weight::Normal,
                color,
                align: Align::Right,
            }));
        }
    }
}

fn subject_row(subject: &Subject) -> Vec<String> {
    vec![
        subject.course_code.clone(),
        subject.course_name.clone(),
        assessment_breakdown(&subject.assessments),
        format!(
            "{}/{}",
            format_marks(subject.total_marks_obtained),
            format_marks(subject.total_max_marks)
        ),
        format_percentage(subject.overall_percentage, 2),
        subject.overall_grade.to_string(),
    ]
}

/// One `"{exam type}: {percent}%"` line per assessment.
pub fn assessment_breakdown(assessments: &[Assessment]) -> String {
    assessments
        .iter()
        .map(|a| format!("{}: {}", a.exam_type, format_percentage(a.percentage, 0)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::assemble;
    use crate::layout::{Page, EPSILON};
    use crate::models::ExamType;
    use crate::source::ReportData;
    use crate::source::testing::{course, mark, profile};
    use chrono::NaiveDate;

    fn document(subjects: usize, assessments_each: usize) -> ReportCardDocument {
        let courses = (0..subjects)
            .map(|i| course(i as i64, &format!("C{i:03}"), 3))
            .collect();
        let marks = (0..subjects)
            .flat_map(|i| {
                (0..assessments_each).map(move |k| mark(i as i64, ExamType::Quiz, (k * 7 % 10) as f64, 10.0))
            })
            .collect();
        let data = ReportData {
            profile: profile(),
            courses,
            marks,
            gpa: Some(3.1),
            total_credits: None,
        };
        let now = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap().and_hms_opt(9, 15, 0).unwrap();
        assemble(&data, "Academic Portal", now)
    }

    fn assert_no_overflow_or_overlap(geometry: &PageGeometry, pages: &[Page]) {
        for page in pages {
            let mut blocks = page.blocks.clone();
            blocks.sort_by(|a, b| a.top.total_cmp(&b.top));
            for pair in blocks.windows(2) {
                assert!(
                    pair[1].top + EPSILON >= pair[0].bottom(),
                    "page {}: {:?} overlaps {:?}",
                    page.number,
                    pair[0].kind,
                    pair[1].kind
                );
            }
            for block in &blocks {
                assert!(block.top + EPSILON >= geometry.margin_top);
                assert!(block.bottom() <= geometry.content_bottom() + EPSILON);
            }
        }
    }

    #[test]
    fn test_single_page_section_order() {
        let laid = ReportCardLayout::new("Academic Portal").unwrap().layout(&document(1, 2)).unwrap();

        assert_eq!(laid.page_count(), 1);
        let kinds: Vec<BlockKind> = laid.pages[0].blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Header,
                BlockKind::StudentInfo,
                BlockKind::SectionTitle,
                BlockKind::TableHeader,
                BlockKind::TableRow(0),
                BlockKind::SectionTitle,
                BlockKind::Summary,
                BlockKind::DocumentFooter,
            ]
        );
        assert_no_overflow_or_overlap(&laid.geometry, &laid.pages);

        let texts: Vec<&str> = laid.pages[0].texts().collect();
        assert!(texts.contains(&"Fall Semester 2026-2027"));
        assert!(texts.contains(&"QUIZ: 0%"));
        assert!(texts.contains(&"GPA:"));
        assert!(!texts.contains(&"Total Credits:"));
        assert!(texts.contains(&"Page 1 of 1"));
        assert!(texts.contains(&"Generated on October 16, 2026 at 09:15 AM"));
    }

    #[test]
    fn test_long_table_paginates_with_stamped_footers() {
        let laid = ReportCardLayout::new("Academic Portal").unwrap().layout(&document(45, 4)).unwrap();
        let total = laid.page_count();
        assert!(total >= 3);
        assert_no_overflow_or_overlap(&laid.geometry, &laid.pages);

        for page in &laid.pages {
            let stamp = format!("Page {} of {}", page.number, total);
            assert!(page.texts().any(|t| t == stamp));
            assert!(page.texts().any(|t| t == "Generated by Academic Portal"));
        }

        // Every continuation page that holds rows starts with a repeated header
        for page in laid.pages.iter().skip(1) {
            if page.blocks.iter().any(|b| matches!(b.kind, BlockKind::TableRow(_))) {
                assert_eq!(page.blocks[0].kind, BlockKind::TableHeader);
            }
        }

        let mut rows: Vec<usize> = laid
            .pages
            .iter()
            .flat_map(|p| &p.blocks)
            .filter_map(|b| match b.kind {
                BlockKind::TableRow(i) => Some(i),
                _ => None,
            })
            .collect();
        rows.sort_unstable();
        assert_eq!(rows, (0..45).collect::<Vec<_>>());

        let last = laid.pages.last().unwrap();
        assert_eq!(last.blocks.last().unwrap().kind, BlockKind::DocumentFooter);
    }

    #[test]
    fn test_row_taller_than_page_fails() {
        let geometry = PageGeometry {
            height: 150.0,
            ..PageGeometry::A4
        };
        let mut doc = document(2, 1);
        let assessment = doc.subjects[1].assessments[0].clone();
        doc.subjects[1].assessments = vec![assessment; 30];

        let err = ReportCardLayout::with_geometry(geometry, Styles::default(), "Academic Portal")
            .unwrap()
            .layout(&doc)
            .unwrap_err();
        assert!(matches!(err, LayoutError::RowTooTall { row: 1, .. }));
    }

    #[test]
    fn test_tall_first_row_moves_to_next_page() {
        for first in [true, false] {
            let mut doc = document(2, 1);
            let index = if first { 0 } else { 1 };
            let assessment = doc.subjects[index].assessments[0].clone();
            doc.subjects[index].assessments = vec![assessment; 57];

            let laid = ReportCardLayout::new("Academic Portal").unwrap().layout(&doc).unwrap();
            assert_no_overflow_or_overlap(&laid.geometry, &laid.pages);

            for page in &laid.pages {
                let first_row = page.blocks.iter().position(|b| matches!(b.kind, BlockKind::TableRow(_)));
                if let Some(row) = first_row {
                    assert!(page.blocks[..row].iter().any(|b| b.kind == BlockKind::TableHeader));
                }
            }
            let rows = laid
                .pages
                .iter()
                .flat_map(|p| &p.blocks)
                .filter(|b| matches!(b.kind, BlockKind::TableRow(_)))
                .count();
            assert_eq!(rows, 2);
        }
    }

    #[test]
    fn test_document_footer_breaks_to_own_page() {
        let geometry = PageGeometry::A4;
        let footer_alone = (1..=40)
            .map(|n| ReportCardLayout::new("Academic Portal").unwrap().layout(&document(n, 1)).unwrap())
            .find(|laid| {
                let last = laid.pages.last().unwrap();
                last.blocks.len() == 1 && last.blocks[0].kind == BlockKind::DocumentFooter
            })
            .expect("some table length leaves no room for the footer");

        let total = footer_alone.page_count();
        assert!(total >= 2);
        let last = &footer_alone.pages[total - 1];
        assert_eq!(last.blocks[0].top, geometry.content_bottom() - last.blocks[0].height);
        assert!(last.texts().any(|t| t == format!("Page {total} of {total}")));

        let previous = &footer_alone.pages[total - 2];
        assert_eq!(previous.blocks.last().unwrap().kind, BlockKind::Summary);
        assert!(previous.blocks.iter().all(|b| b.kind != BlockKind::DocumentFooter));
        assert_no_overflow_or_overlap(&footer_alone.geometry, &footer_alone.pages);
    }

    #[test]
    fn test_assessment_breakdown_format() {
        let doc = document(1, 2);
        assert_eq!(assessment_breakdown(&doc.subjects[0].assessments), "QUIZ: 0%\nQUIZ: 70%");
    }
}
