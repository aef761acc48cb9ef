use serde::{Deserialize, Serialize};

use crate::model::{Exam, ExamResult, Question, Student};

pub const UNKNOWN_EXAM_TITLE: &str = "Unknown Exam";
pub const REPORT_EXAM_TITLE_FALLBACK: &str = "Exam Result";
pub const CLASS_LEVEL_FALLBACK: &str = "-";

/// School identity and the fixed time-taken figure stamped on printed
/// reports. Configurable via `session.connect`; the defaults match the
/// values the legacy console shipped with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportBranding {
    pub school_name: String,
    pub school_logo_url: String,
    pub time_taken_minutes: i64,
}

impl Default for ReportBranding {
    fn default() -> Self {
        ReportBranding {
            school_name: "Faith Immaculate Academy".to_string(),
            school_logo_url: "https://placehold.co/150x50/3b82f6/ffffff?text=FIA+CBT".to_string(),
            time_taken_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub student_id: String,
    pub grade_level: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    pub score: f64,
    pub total: f64,
    pub percentage: f64,
    pub time_taken_minutes: i64,
    pub status: String,
}

/// Per-subject correctness tally within one exam's question set.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectBreakdown {
    pub subject: String,
    pub questions: usize,
    pub correct: usize,
    pub percentage: f64,
}

/// Print-ready summary for one completed exam. Derived and ephemeral:
/// recomputed from the current snapshots on every print action, never
/// cached.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub school_name: String,
    pub school_logo_url: String,
    pub exam_title: String,
    pub candidate: Candidate,
    pub overall_result: OverallResult,
    pub subject_breakdown: Vec<SubjectBreakdown>,
}

/// Exam title for the results table; results whose exam no longer exists
/// keep a placeholder rather than failing.
pub fn exam_title(exams: &[Exam], exam_id: &str) -> String {
    exams
        .iter()
        .find(|e| e.id == exam_id)
        .map(|e| e.title.clone())
        .unwrap_or_else(|| UNKNOWN_EXAM_TITLE.to_string())
}

/// Joins one result against the exam, question and student collections
/// into a ReportPayload. Pure over its inputs; lookup misses degrade to
/// placeholders instead of erroring.
pub fn compose_report(
    result: &ExamResult,
    exams: &[Exam],
    questions: &[Question],
    students: &[Student],
    branding: &ReportBranding,
) -> ReportPayload {
    let exam = exams.iter().find(|e| e.id == result.exam_id);
    let student = students.iter().find(|s| s.student_id == result.student_id);

    let breakdown = match exam {
        Some(exam) => subject_breakdown(exam, questions, result),
        None => Vec::new(),
    };

    ReportPayload {
        school_name: branding.school_name.clone(),
        school_logo_url: branding.school_logo_url.clone(),
        exam_title: exam
            .map(|e| e.title.clone())
            .unwrap_or_else(|| REPORT_EXAM_TITLE_FALLBACK.to_string()),
        candidate: Candidate {
            name: result.student_name.clone(),
            student_id: result.student_id.clone(),
            grade_level: student
                .and_then(|s| s.class_level.clone())
                .unwrap_or_else(|| CLASS_LEVEL_FALLBACK.to_string()),
            date: result.completed_at.format("%Y-%m-%d").to_string(),
        },
        overall_result: OverallResult {
            score: result.score,
            total: result.total_points,
            percentage: result.percentage,
            time_taken_minutes: branding.time_taken_minutes,
            status: if result.passed { "PASS" } else { "FAIL" }.to_string(),
        },
        subject_breakdown: breakdown,
    }
}

fn subject_breakdown(
    exam: &Exam,
    questions: &[Question],
    result: &ExamResult,
) -> Vec<SubjectBreakdown> {
    let exam_questions: Vec<&Question> = questions
        .iter()
        .filter(|q| exam.question_ids.contains(&q.id))
        .collect();

    // Distinct subjects in first-seen order.
    let mut subjects: Vec<&str> = Vec::new();
    for q in &exam_questions {
        if !subjects.contains(&q.subject.as_str()) {
            subjects.push(q.subject.as_str());
        }
    }

    subjects
        .into_iter()
        .map(|subject| {
            let mut total = 0usize;
            let mut correct = 0usize;
            for q in exam_questions.iter().filter(|q| q.subject == subject) {
                total += 1;
                if result.correct_answers.get(&q.id).copied().unwrap_or(false) {
                    correct += 1;
                }
            }
            let percentage = if total > 0 {
                100.0 * (correct as f64) / (total as f64)
            } else {
                0.0
            };
            SubjectBreakdown {
                subject: subject.to_string(),
                questions: total,
                correct,
                percentage,
            }
        })
        .collect()
}
