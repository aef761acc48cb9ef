use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::model::{Exam, ExamResult, Question, Student, StudentDraft};

/// Failure talking to the CBT backend. Mutating handlers surface this as
/// a generic user-facing error; no partial state is applied.
#[derive(Debug, Clone)]
pub struct BackendError {
    pub message: String,
    pub status: Option<u16>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        BackendError {
            message: message.into(),
            status: Some(status),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "backend returned {}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        }
    }
}

/// Outcome of a bulk roster upload. Partial-failure semantics belong to
/// the backend; the daemon treats the call as all-or-nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateSummary {
    #[serde(default)]
    pub created: usize,
}

/// The REST contract the admin screens consume. Collections are fetched
/// whole; the daemon keeps read-only snapshots and re-fetches after every
/// mutation instead of merging optimistically.
pub trait Backend {
    fn list_results(&self) -> Result<Vec<ExamResult>, BackendError>;
    fn list_exams(&self) -> Result<Vec<Exam>, BackendError>;
    fn list_questions(&self) -> Result<Vec<Question>, BackendError>;
    fn list_students(&self) -> Result<Vec<Student>, BackendError>;
    fn create_student(&self, draft: &StudentDraft) -> Result<Student, BackendError>;
    fn update_student(&self, id: &str, draft: &StudentDraft) -> Result<Student, BackendError>;
    fn delete_student(&self, id: &str) -> Result<(), BackendError>;
    fn bulk_create_students(&self, rows: &[StudentDraft])
        -> Result<BulkCreateSummary, BackendError>;
}

/// `Backend` over HTTP with the CBT API's JSON routes.
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let resp = self.client.get(self.url(path)).send()?;
        Self::decode(resp)
    }

    fn decode<T: serde::de::DeserializeOwned>(
        resp: reqwest::blocking::Response,
    ) -> Result<T, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(BackendError::with_status(body, status.as_u16()));
        }
        resp.json::<T>().map_err(BackendError::from)
    }
}

impl Backend for HttpBackend {
    fn list_results(&self) -> Result<Vec<ExamResult>, BackendError> {
        self.get_json("/api/results")
    }

    fn list_exams(&self) -> Result<Vec<Exam>, BackendError> {
        self.get_json("/api/exams")
    }

    fn list_questions(&self) -> Result<Vec<Question>, BackendError> {
        self.get_json("/api/questions")
    }

    fn list_students(&self) -> Result<Vec<Student>, BackendError> {
        self.get_json("/api/students")
    }

    fn create_student(&self, draft: &StudentDraft) -> Result<Student, BackendError> {
        let resp = self
            .client
            .post(self.url("/api/students"))
            .json(draft)
            .send()?;
        Self::decode(resp)
    }

    fn update_student(&self, id: &str, draft: &StudentDraft) -> Result<Student, BackendError> {
        let resp = self
            .client
            .put(self.url(&format!("/api/students/{}", id)))
            .json(draft)
            .send()?;
        Self::decode(resp)
    }

    fn delete_student(&self, id: &str) -> Result<(), BackendError> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/students/{}", id)))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(BackendError::with_status(body, status.as_u16()));
        }
        Ok(())
    }

    fn bulk_create_students(
        &self,
        rows: &[StudentDraft],
    ) -> Result<BulkCreateSummary, BackendError> {
        let resp = self
            .client
            .post(self.url("/api/students/bulk"))
            .json(&json!({ "students": rows }))
            .send()?;
        Self::decode(resp)
    }
}
