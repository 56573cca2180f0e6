//! Grade calculation: letter grades, 4.0-scale grade points, averages and GPA.
//!
//! All functions are total. Percentages outside 0..=100 fall into the lowest
//! or highest bucket.

use serde::Serialize;

/// Letter grade thresholds (inclusive lower bounds), highest first.
const LETTER_SCALE: [(f64, &str); 10] = [
    (90.0, "A+"),
    (85.0, "A"),
    (80.0, "A-"),
    (75.0, "B+"),
    (70.0, "B"),
    (65.0, "B-"),
    (60.0, "C+"),
    (55.0, "C"),
    (50.0, "C-"),
    (45.0, "D"),
];

/// Grade point thresholds. Kept separate from the letter scale: 85 and 90
/// both earn 4.0.
const POINT_SCALE: [(f64, f64); 10] = [
    (90.0, 4.0),
    (85.0, 4.0),
    (80.0, 3.7),
    (75.0, 3.3),
    (70.0, 3.0),
    (65.0, 2.7),
    (60.0, 2.3),
    (55.0, 2.0),
    (50.0, 1.7),
    (45.0, 1.3),
];

const DESCRIPTOR_SCALE: [(f64, &str); 5] = [
    (90.0, "Excellent"),
    (80.0, "Very Good"),
    (70.0, "Good"),
    (60.0, "Satisfactory"),
    (50.0, "Pass"),
];

/// Grade shown when there is nothing to grade.
pub const NO_GRADE: &str = "N/A";

/// Letter, points and descriptor for one percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeInfo {
    pub letter: &'static str,
    pub points: f64,
    pub description: &'static str,
}

/// Letter grade for a percentage.
pub fn letter_grade(percentage: f64) -> &'static str {
    LETTER_SCALE
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map(|(_, letter)| *letter)
        .unwrap_or("F")
}

/// Grade points on the 4.0 scale.
pub fn grade_points(percentage: f64) -> f64 {
    POINT_SCALE
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// Qualitative descriptor ("Excellent" .. "Fail").
pub fn descriptor(percentage: f64) -> &'static str {
    DESCRIPTOR_SCALE
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map(|(_, text)| *text)
        .unwrap_or("Fail")
}

/// Full grade information for a percentage.
pub fn grade_info(percentage: f64) -> GradeInfo {
    GradeInfo {
        letter: letter_grade(percentage),
        points: grade_points(percentage),
        description: descriptor(percentage),
    }
}

/// Percentage of one obtained/max pair.
pub fn percentage(obtained: f64, max: f64) -> f64 {
    obtained / max * 100.0
}

/// One scored item for [`weighted_average`].
#[derive(Debug, Clone, Copy)]
pub struct ScoredItem {
    pub marks_obtained: f64,
    pub max_marks: f64,
    /// Defaults to 1 when `None`.
    pub weight: Option<f64>,
}

/// Weighted mean of item percentages: sum(p * w) / sum(w). Zero for no items
/// or when the weights sum to zero.
pub fn weighted_average(items: &[ScoredItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }

    let (weighted_sum, total_weight) = items.iter().fold((0.0, 0.0), |(sum, weights), item| {
        let weight = item.weight.unwrap_or(1.0);
        (
            sum + percentage(item.marks_obtained, item.max_marks) * weight,
            weights + weight,
        )
    });

    if total_weight == 0.0 {
        return 0.0;
    }
    weighted_sum / total_weight
}

/// GPA over course percentages.
///
/// Credit-weighted when `credits` has one entry per course, otherwise the
/// simple mean of grade points.
pub fn gpa(course_percentages: &[f64], credits: Option<&[f64]>) -> f64 {
    if course_percentages.is_empty() {
        return 0.0;
    }

    match credits {
        Some(credits) if credits.len() == course_percentages.len() => {
            let total_credits: f64 = credits.iter().sum();
            let weighted_points: f64 = course_percentages
                .iter()
                .zip(credits)
                .map(|(p, c)| grade_points(*p) * c)
                .sum();
            if total_credits > 0.0 {
                weighted_points / total_credits
            } else {
                0.0
            }
        }
        _ => {
            let total_points: f64 = course_percentages.iter().map(|p| grade_points(*p)).sum();
            total_points / course_percentages.len() as f64
        }
    }
}

/// Format a percentage for display, e.g. `85.00%`.
pub fn format_percentage(percentage: f64, decimals: usize) -> String {
    format!("{percentage:.decimals$}%")
}

/// Format a GPA with two decimals.
pub fn format_gpa(gpa: f64) -> String {
    format!("{gpa:.2}")
}

/// Format a marks value, dropping the fraction for whole numbers.
pub fn format_marks(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
