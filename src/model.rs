use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Class levels offered by the admin UI. The backend owns validation;
/// the daemon passes codes through verbatim.
pub const CLASS_LEVELS: &[&str] = &[
    "JSS1", "JSS2", "JSS3", "SS1", "SS2", "SS3", "WAEC", "NECO", "GCE WAEC", "GCE NECO",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub question_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: String,
    pub exam_id: String,
    pub student_id: String,
    pub student_name: String,
    pub score: f64,
    pub total_points: f64,
    pub percentage: f64,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub correct_answers: HashMap<String, bool>,
}

/// The full editable surface of a student record. Create, update and CSV
/// import all submit this shape; `id` stays backend-assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    pub student_id: String,
    pub class_level: String,
    pub sex: String,
}

impl From<&Student> for StudentDraft {
    fn from(s: &Student) -> Self {
        StudentDraft {
            name: s.name.clone(),
            student_id: s.student_id.clone(),
            class_level: s.class_level.clone().unwrap_or_default(),
            sex: s.sex.clone().unwrap_or_default(),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive substring match against a display name or student
/// code. An empty query matches everything.
pub fn matches_query(name: &str, student_id: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    contains_ci(name, &q) || contains_ci(student_id, &q)
}

/// Filters results by student name or student code, preserving order.
pub fn filter_results<'a>(results: &'a [ExamResult], query: &str) -> Vec<&'a ExamResult> {
    results
        .iter()
        .filter(|r| matches_query(&r.student_name, &r.student_id, query))
        .collect()
}

/// Filters students by name or student code, preserving order.
pub fn filter_students<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    students
        .iter()
        .filter(|s| matches_query(&s.name, &s.student_id, query))
        .collect()
}
