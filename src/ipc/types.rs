use serde::Deserialize;

use crate::backend::Backend;
use crate::form::EditForm;
use crate::model::{Exam, ExamResult, Question, Student};
use crate::report::ReportBranding;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Snapshot state for the results screen: refreshable read-only copies of
/// the four backend collections the report join needs.
#[derive(Default)]
pub struct ResultsScreen {
    pub results: Vec<ExamResult>,
    pub exams: Vec<Exam>,
    pub questions: Vec<Question>,
    pub students: Vec<Student>,
}

/// Snapshot state for the roster screen plus the edit dialog.
#[derive(Default)]
pub struct RosterScreen {
    pub students: Vec<Student>,
    pub edit: EditForm,
}

pub struct AppState {
    pub backend: Option<Box<dyn Backend>>,
    pub branding: ReportBranding,
    pub results: ResultsScreen,
    pub roster: RosterScreen,
}

impl AppState {
    pub fn new(backend: Option<Box<dyn Backend>>) -> Self {
        AppState {
            backend,
            branding: ReportBranding::default(),
            results: ResultsScreen::default(),
            roster: RosterScreen::default(),
        }
    }
}
