// Shared across the integration suites; not every binary uses every helper.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use cbtadmind::backend::{Backend, BackendError, BulkCreateSummary};
use cbtadmind::ipc::{handle_request, AppState, Request};
use cbtadmind::model::{Exam, ExamResult, Question, Student, StudentDraft};

/// In-memory stand-in for the CBT REST backend. Counts calls so tests can
/// assert that local validation short-circuits before the network.
#[derive(Default)]
pub struct MemoryBackendInner {
    pub results: Vec<ExamResult>,
    pub exams: Vec<Exam>,
    pub questions: Vec<Question>,
    pub students: Vec<Student>,
    pub mutation_calls: usize,
    pub fail_mutations: bool,
    pub fail_lists: bool,
}

#[derive(Clone, Default)]
pub struct MemoryBackend(pub Arc<Mutex<MemoryBackendInner>>);

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MemoryBackendInner) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }

    fn check_failure(&self) -> Result<(), BackendError> {
        let mut inner = self.0.lock().unwrap();
        inner.mutation_calls += 1;
        if inner.fail_mutations {
            Err(BackendError::with_status("simulated failure", 500))
        } else {
            Ok(())
        }
    }
}

impl Backend for MemoryBackend {
    fn list_results(&self) -> Result<Vec<ExamResult>, BackendError> {
        let inner = self.0.lock().unwrap();
        check_lists(&inner)?;
        Ok(inner.results.clone())
    }

    fn list_exams(&self) -> Result<Vec<Exam>, BackendError> {
        let inner = self.0.lock().unwrap();
        check_lists(&inner)?;
        Ok(inner.exams.clone())
    }

    fn list_questions(&self) -> Result<Vec<Question>, BackendError> {
        let inner = self.0.lock().unwrap();
        check_lists(&inner)?;
        Ok(inner.questions.clone())
    }

    fn list_students(&self) -> Result<Vec<Student>, BackendError> {
        let inner = self.0.lock().unwrap();
        check_lists(&inner)?;
        Ok(inner.students.clone())
    }

    fn create_student(&self, draft: &StudentDraft) -> Result<Student, BackendError> {
        self.check_failure()?;
        let student = student_from_draft(draft);
        self.0.lock().unwrap().students.push(student.clone());
        Ok(student)
    }

    fn update_student(&self, id: &str, draft: &StudentDraft) -> Result<Student, BackendError> {
        self.check_failure()?;
        let mut inner = self.0.lock().unwrap();
        let Some(existing) = inner.students.iter_mut().find(|s| s.id == id) else {
            return Err(BackendError::with_status("unknown student", 404));
        };
        existing.name = draft.name.clone();
        existing.student_id = draft.student_id.clone();
        existing.class_level = non_empty(&draft.class_level);
        existing.sex = non_empty(&draft.sex);
        Ok(existing.clone())
    }

    fn delete_student(&self, id: &str) -> Result<(), BackendError> {
        self.check_failure()?;
        let mut inner = self.0.lock().unwrap();
        let before = inner.students.len();
        inner.students.retain(|s| s.id != id);
        if inner.students.len() == before {
            return Err(BackendError::with_status("unknown student", 404));
        }
        Ok(())
    }

    fn bulk_create_students(
        &self,
        rows: &[StudentDraft],
    ) -> Result<BulkCreateSummary, BackendError> {
        self.check_failure()?;
        let mut inner = self.0.lock().unwrap();
        for draft in rows {
            inner.students.push(student_from_draft(draft));
        }
        Ok(BulkCreateSummary {
            created: rows.len(),
        })
    }
}

fn check_lists(inner: &MemoryBackendInner) -> Result<(), BackendError> {
    if inner.fail_lists {
        Err(BackendError::new("simulated fetch failure"))
    } else {
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn student_from_draft(draft: &StudentDraft) -> Student {
    Student {
        id: uuid::Uuid::new_v4().to_string(),
        name: draft.name.clone(),
        student_id: draft.student_id.clone(),
        class_level: non_empty(&draft.class_level),
        sex: non_empty(&draft.sex),
    }
}

pub fn connected_state(backend: &MemoryBackend) -> AppState {
    AppState::new(Some(Box::new(backend.clone())))
}

pub fn student(id: &str, name: &str, student_id: &str, class_level: &str, sex: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        student_id: student_id.to_string(),
        class_level: non_empty(class_level),
        sex: non_empty(sex),
    }
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn result_row(
    id: &str,
    exam_id: &str,
    student_id: &str,
    student_name: &str,
    completed_at: DateTime<Utc>,
) -> ExamResult {
    ExamResult {
        id: id.to_string(),
        exam_id: exam_id.to_string(),
        student_id: student_id.to_string(),
        student_name: student_name.to_string(),
        score: 7.0,
        total_points: 10.0,
        percentage: 70.0,
        passed: true,
        completed_at,
        correct_answers: Default::default(),
    }
}

pub fn request(id: &str, method: &str, params: serde_json::Value) -> Request {
    serde_json::from_value(json!({
        "id": id,
        "method": method,
        "params": params,
    }))
    .expect("request")
}

/// Dispatches one request and unwraps the ok-result payload.
pub fn request_ok(
    state: &mut AppState,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let resp = handle_request(state, request(id, method, params));
    assert_eq!(
        resp.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "expected ok response, got: {}",
        resp
    );
    resp.get("result").cloned().unwrap_or_default()
}

/// Dispatches one request expected to fail and returns the error code.
pub fn request_err(
    state: &mut AppState,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let resp = handle_request(state, request(id, method, params));
    assert_eq!(
        resp.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "expected error response, got: {}",
        resp
    );
    resp.pointer("/error/code")
        .and_then(|v| v.as_str())
        .expect("error code")
        .to_string()
}
