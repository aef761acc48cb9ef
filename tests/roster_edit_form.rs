mod support;

use serde_json::json;
use support::{connected_state, request_err, request_ok, student, MemoryBackend};

fn state_with_one_student(backend: &MemoryBackend) -> cbtadmind::ipc::AppState {
    backend.with(|b| {
        b.students = vec![student("s1", "John Doe", "student-001", "JSS1", "M")];
    });
    let mut state = connected_state(backend);
    request_ok(&mut state, "0", "roster.refresh", json!({}));
    state
}

#[test]
fn open_then_cancel_leaves_backend_unchanged() {
    let backend = MemoryBackend::new();
    let mut state = state_with_one_student(&backend);

    let opened = request_ok(&mut state, "1", "roster.editOpen", json!({ "id": "s1" }));
    assert_eq!(
        opened.pointer("/draft/name").and_then(|v| v.as_str()),
        Some("John Doe")
    );

    request_ok(
        &mut state,
        "2",
        "roster.editField",
        json!({ "field": "name", "value": "Johnny Doe" }),
    );
    request_ok(&mut state, "3", "roster.editCancel", json!({}));

    assert_eq!(backend.with(|b| b.mutation_calls), 0);
    assert_eq!(backend.with(|b| b.students[0].name.clone()), "John Doe");
    assert!(!state.roster.edit.is_open());
}

#[test]
fn submit_sends_full_draft_keyed_by_original_id_and_closes() {
    let backend = MemoryBackend::new();
    let mut state = state_with_one_student(&backend);

    request_ok(&mut state, "1", "roster.editOpen", json!({ "id": "s1" }));
    request_ok(
        &mut state,
        "2",
        "roster.editField",
        json!({ "field": "name", "value": "Johnny Doe" }),
    );
    request_ok(
        &mut state,
        "3",
        "roster.editField",
        json!({ "field": "classLevel", "value": "SS1" }),
    );
    let submitted = request_ok(&mut state, "4", "roster.editSubmit", json!({}));
    assert_eq!(
        submitted.pointer("/student/name").and_then(|v| v.as_str()),
        Some("Johnny Doe")
    );

    assert!(!state.roster.edit.is_open());
    // Snapshot mirrors the refreshed backend state.
    assert_eq!(state.roster.students[0].name, "Johnny Doe");
    assert_eq!(state.roster.students[0].class_level.as_deref(), Some("SS1"));
    // Untouched fields rode along in the full draft.
    assert_eq!(state.roster.students[0].sex.as_deref(), Some("M"));
}

#[test]
fn blank_name_is_rejected_before_any_backend_call() {
    let backend = MemoryBackend::new();
    let mut state = state_with_one_student(&backend);

    request_ok(&mut state, "1", "roster.editOpen", json!({ "id": "s1" }));
    request_ok(
        &mut state,
        "2",
        "roster.editField",
        json!({ "field": "name", "value": "  " }),
    );
    let code = request_err(&mut state, "3", "roster.editSubmit", json!({}));
    assert_eq!(code, "bad_params");
    assert_eq!(backend.with(|b| b.mutation_calls), 0);
    // The dialog stays open for correction.
    assert!(state.roster.edit.is_open());
}

#[test]
fn submit_without_open_form_is_rejected() {
    let backend = MemoryBackend::new();
    let mut state = state_with_one_student(&backend);

    let code = request_err(&mut state, "1", "roster.editSubmit", json!({}));
    assert_eq!(code, "bad_state");
    assert_eq!(backend.with(|b| b.mutation_calls), 0);
}

#[test]
fn backend_failure_keeps_the_form_open_with_the_draft() {
    let backend = MemoryBackend::new();
    let mut state = state_with_one_student(&backend);

    request_ok(&mut state, "1", "roster.editOpen", json!({ "id": "s1" }));
    request_ok(
        &mut state,
        "2",
        "roster.editField",
        json!({ "field": "name", "value": "Johnny Doe" }),
    );
    backend.with(|b| b.fail_mutations = true);

    let code = request_err(&mut state, "3", "roster.editSubmit", json!({}));
    assert_eq!(code, "backend_error");
    assert!(state.roster.edit.is_open());
    assert_eq!(
        state.roster.edit.draft().map(|d| d.name.clone()),
        Some("Johnny Doe".to_string())
    );
}

#[test]
fn unknown_field_and_unknown_student_are_reported() {
    let backend = MemoryBackend::new();
    let mut state = state_with_one_student(&backend);

    let code = request_err(&mut state, "1", "roster.editOpen", json!({ "id": "nope" }));
    assert_eq!(code, "not_found");

    request_ok(&mut state, "2", "roster.editOpen", json!({ "id": "s1" }));
    let code = request_err(
        &mut state,
        "3",
        "roster.editField",
        json!({ "field": "nickname", "value": "JD" }),
    );
    assert_eq!(code, "bad_params");
}
