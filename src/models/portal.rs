//! Portal DTOs consumed read-only by the report card engine.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Student profile from `GET /student/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Institution student number, e.g. `CSE-001`.
    pub student_id: String,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl StudentProfile {
    /// Display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Enrolled course from `GET /student/courses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    #[serde(default)]
    pub credits: u32,
}

/// Assessment kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExamType {
    Midterm,
    Final,
    Assignment,
    Quiz,
    /// Any value the portal adds later.
    Other(String),
}

impl ExamType {
    /// Portal wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Midterm => "MIDTERM",
            Self::Final => "FINAL",
            Self::Assignment => "ASSIGNMENT",
            Self::Quiz => "QUIZ",
            Self::Other(name) => name,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "MIDTERM" => Self::Midterm,
            "FINAL" => Self::Final,
            "ASSIGNMENT" => Self::Assignment,
            "QUIZ" => Self::Quiz,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExamType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// One mark record from `GET /student/marks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecord {
    pub course_id: i64,
    pub exam_type: ExamType,
    pub marks_obtained: f64,
    pub max_marks: f64,
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_portal_marks() {
        let json = r#"[
            {"id": 7, "courseId": 3, "courseCode": "CS101", "examType": "MIDTERM",
             "marksObtained": 42.5, "maxMarks": 50, "percentage": 85.0,
             "remarks": "", "examDate": "2025-03-14"},
            {"courseId": 3, "examType": "LAB", "marksObtained": 9, "maxMarks": 10, "examDate": null}
        ]"#;
        let marks: Vec<MarkRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].exam_type, ExamType::Midterm);
        assert_eq!(marks[0].max_marks, 50.0);
        assert_eq!(marks[0].exam_date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(marks[1].exam_type, ExamType::Other("LAB".to_string()));
        assert!(marks[1].exam_date.is_none());
    }

    #[test]
    fn test_parse_profile_and_courses() {
        let profile: StudentProfile = serde_json::from_str(
            r#"{"id": 1, "userId": 9, "firstName": "Ada", "lastName": "Lovelace",
                "studentId": "CSE-001", "className": "10-A", "isActive": true}"#,
        )
        .unwrap();
        assert_eq!(profile.full_name(), "Ada Lovelace");
        assert_eq!(profile.class_name.as_deref(), Some("10-A"));
        assert!(profile.email.is_none());

        let courses: Vec<Course> = serde_json::from_str(
            r#"[{"id": 3, "courseCode": "CS101", "courseName": "Programming", "semester": 1,
                 "credits": 4, "teacherIds": [], "teacherNames": []}]"#,
        )
        .unwrap();
        assert_eq!(courses[0].credits, 4);
    }

    #[test]
    fn test_exam_type_display() {
        assert_eq!(ExamType::parse("quiz").to_string(), "QUIZ");
        assert_eq!(ExamType::Final.as_str(), "FINAL");
    }
}
