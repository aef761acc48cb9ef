use serde_json::json;

use super::required_str;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::{filter_results, ExamResult};
use crate::render::{print_document, FALLBACK_STYLESHEET};
use crate::report::{compose_report, exam_title, ReportPayload};

/// Fetch-and-replace for all four collections the screen joins over.
/// A failed fetch leaves that collection empty and the screen degrades
/// (placeholder exam titles, empty breakdowns) rather than erroring.
fn handle_refresh(state: &mut AppState, req: &Request) -> serde_json::Value {
    let AppState {
        backend, results, ..
    } = state;
    let Some(backend) = backend.as_deref() else {
        return err(&req.id, "no_backend", "connect to a backend first", None);
    };

    results.results = backend.list_results().unwrap_or_else(|e| {
        tracing::warn!("results fetch failed: {}", e);
        Vec::new()
    });
    results.exams = backend.list_exams().unwrap_or_else(|e| {
        tracing::warn!("exams fetch failed: {}", e);
        Vec::new()
    });
    results.questions = backend.list_questions().unwrap_or_else(|e| {
        tracing::warn!("questions fetch failed: {}", e);
        Vec::new()
    });
    results.students = backend.list_students().unwrap_or_else(|e| {
        tracing::warn!("students fetch failed: {}", e);
        Vec::new()
    });

    ok(
        &req.id,
        json!({
            "results": results.results.len(),
            "exams": results.exams.len(),
            "questions": results.questions.len(),
            "students": results.students.len(),
        }),
    )
}

/// Table model: filtered by the search query, most recent first, with the
/// exam title joined in per row.
fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let query = req
        .params
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let mut rows: Vec<&ExamResult> = filter_results(&state.results.results, query);
    rows.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    let rows: Vec<serde_json::Value> = rows
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "studentName": r.student_name,
                "studentId": r.student_id,
                "examId": r.exam_id,
                "examTitle": exam_title(&state.results.exams, &r.exam_id),
                "score": r.score,
                "totalPoints": r.total_points,
                "percentage": r.percentage,
                "passed": r.passed,
                "completedAt": r.completed_at,
            })
        })
        .collect();

    ok(&req.id, json!({ "results": rows }))
}

fn composed_payload(
    state: &AppState,
    req: &Request,
) -> Result<ReportPayload, serde_json::Value> {
    let result_id = required_str(req, "resultId")?;
    let result = state
        .results
        .results
        .iter()
        .find(|r| r.id == result_id)
        .ok_or_else(|| err(&req.id, "not_found", "result not found", None))?;

    Ok(compose_report(
        result,
        &state.results.exams,
        &state.results.questions,
        &state.results.students,
        &state.branding,
    ))
}

fn handle_report_model(state: &mut AppState, req: &Request) -> serde_json::Value {
    match composed_payload(state, req) {
        Ok(payload) => ok(&req.id, json!(payload)),
        Err(e) => e,
    }
}

fn handle_print_document(state: &mut AppState, req: &Request) -> serde_json::Value {
    let payload = match composed_payload(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let stylesheets: Vec<String> = req
        .params
        .get("stylesheets")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();
    let fallback = req
        .params
        .get("fallbackStylesheet")
        .and_then(|v| v.as_str())
        .unwrap_or(FALLBACK_STYLESHEET);

    let html = print_document(&payload, &stylesheets, fallback);
    ok(&req.id, json!({ "html": html }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "results.refresh" => Some(handle_refresh(state, req)),
        "results.list" => Some(handle_list(state, req)),
        "results.reportModel" => Some(handle_report_model(state, req)),
        "results.printDocument" => Some(handle_print_document(state, req)),
        _ => None,
    }
}
