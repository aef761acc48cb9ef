use serde_json::json;

use super::required_str;
use crate::backend::Backend;
use crate::form::FormError;
use crate::ipc::error::{backend_err, err, ok};
use crate::ipc::types::{AppState, Request, RosterScreen};
use crate::model::{filter_students, StudentDraft};
use crate::roster_csv;

/// Splits the state into the connected backend and the roster screen so a
/// mutation and the follow-up snapshot replacement can share one borrow.
fn parts<'a>(
    state: &'a mut AppState,
    req: &Request,
) -> Result<(&'a dyn Backend, &'a mut RosterScreen), serde_json::Value> {
    let AppState {
        backend, roster, ..
    } = state;
    match backend.as_deref() {
        Some(b) => Ok((b, roster)),
        None => Err(err(&req.id, "no_backend", "connect to a backend first", None)),
    }
}

/// Fetch-and-replace after every successful mutation. A failed re-fetch
/// keeps the previous snapshot; the mutation itself already succeeded.
fn refresh(backend: &dyn Backend, roster: &mut RosterScreen) {
    match backend.list_students() {
        Ok(students) => roster.students = students,
        Err(e) => tracing::warn!("roster refresh failed: {}", e),
    }
}

fn form_err(req: &Request, e: FormError) -> serde_json::Value {
    let code = match e {
        FormError::NotOpen => "bad_state",
        FormError::UnknownField(_) | FormError::MissingRequired(_) => "bad_params",
    };
    err(&req.id, code, e.message(), None)
}

fn handle_refresh(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (backend, roster) = match parts(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    refresh(backend, roster);
    ok(&req.id, json!({ "students": roster.students.len() }))
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let query = req
        .params
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let rows = filter_students(&state.roster.students, query);
    ok(&req.id, json!({ "students": rows }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut draft = StudentDraft::default();
    for (key, slot) in [
        ("name", &mut draft.name),
        ("studentId", &mut draft.student_id),
        ("classLevel", &mut draft.class_level),
        ("sex", &mut draft.sex),
    ] {
        let value = match required_str(req, key) {
            Ok(v) => v,
            Err(e) => return e,
        };
        if value.trim().is_empty() {
            return err(
                &req.id,
                "bad_params",
                "please provide name, student id, class level, and sex",
                None,
            );
        }
        *slot = value.trim().to_string();
    }

    let (backend, roster) = match parts(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let created = match backend.create_student(&draft) {
        Ok(v) => v,
        Err(e) => return backend_err(&req.id, e),
    };
    refresh(backend, roster);
    ok(&req.id, json!({ "student": created }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let (backend, roster) = match parts(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(e) = backend.delete_student(&id) {
        return backend_err(&req.id, e);
    }
    refresh(backend, roster);
    ok(&req.id, json!({}))
}

fn handle_edit_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(student) = state.roster.students.iter().find(|s| s.id == id).cloned() else {
        return err(&req.id, "not_found", "student not found", None);
    };
    state.roster.edit.open(&student);
    ok(&req.id, json!({ "draft": state.roster.edit.draft() }))
}

fn handle_edit_field(state: &mut AppState, req: &Request) -> serde_json::Value {
    let field = match required_str(req, "field") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let value = match required_str(req, "value") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.roster.edit.set_field(&field, &value) {
        Ok(()) => ok(&req.id, json!({ "draft": state.roster.edit.draft() })),
        Err(e) => form_err(req, e),
    }
}

fn handle_edit_cancel(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.roster.edit.cancel();
    ok(&req.id, json!({}))
}

/// Sends the full draft as an update keyed by the original id, then
/// refreshes and closes. On backend failure the form stays open with the
/// draft intact so the user can retry.
fn handle_edit_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (original_id, draft) = match state.roster.edit.submission() {
        Ok((id, draft)) => (id.to_string(), draft.clone()),
        Err(e) => return form_err(req, e),
    };
    let (backend, roster) = match parts(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let updated = match backend.update_student(&original_id, &draft) {
        Ok(v) => v,
        Err(e) => return backend_err(&req.id, e),
    };
    refresh(backend, roster);
    roster.edit.cancel();
    ok(&req.id, json!({ "student": updated }))
}

fn handle_import_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let text = match required_str(req, "text") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let rows = roster_csv::parse_roster(&text);
    if rows.is_empty() {
        return err(&req.id, "empty_import", "no valid rows found in CSV", None);
    }

    let (backend, roster) = match parts(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(e) = backend.bulk_create_students(&rows) {
        return backend_err(&req.id, e);
    }
    refresh(backend, roster);
    ok(&req.id, json!({ "created": rows.len() }))
}

fn handle_export_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let csv = roster_csv::serialize_roster(&state.roster.students);
    ok(&req.id, json!({ "csv": csv }))
}

fn handle_template_csv(_state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "csv": roster_csv::template() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.refresh" => Some(handle_refresh(state, req)),
        "roster.list" => Some(handle_list(state, req)),
        "roster.create" => Some(handle_create(state, req)),
        "roster.delete" => Some(handle_delete(state, req)),
        "roster.editOpen" => Some(handle_edit_open(state, req)),
        "roster.editField" => Some(handle_edit_field(state, req)),
        "roster.editCancel" => Some(handle_edit_cancel(state, req)),
        "roster.editSubmit" => Some(handle_edit_submit(state, req)),
        "roster.importCsv" => Some(handle_import_csv(state, req)),
        "roster.exportCsv" => Some(handle_export_csv(state, req)),
        "roster.templateCsv" => Some(handle_template_csv(state, req)),
        _ => None,
    }
}
