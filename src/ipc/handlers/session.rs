use serde_json::json;

use super::{optional_str, required_str};
use crate::backend::HttpBackend;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn handle_connect(state: &mut AppState, req: &Request) -> serde_json::Value {
    let base_url = match required_str(req, "baseUrl") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let backend = match HttpBackend::new(&base_url) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "connect_failed", e.to_string(), None),
    };

    if let Some(name) = optional_str(req, "schoolName") {
        state.branding.school_name = name;
    }
    if let Some(url) = optional_str(req, "schoolLogoUrl") {
        state.branding.school_logo_url = url;
    }
    if let Some(minutes) = req.params.get("timeTakenMinutes").and_then(|v| v.as_i64()) {
        state.branding.time_taken_minutes = minutes;
    }

    state.backend = Some(Box::new(backend));
    tracing::info!(base_url = %base_url, "connected to backend");
    ok(&req.id, json!({ "baseUrl": base_url }))
}

fn handle_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "connected": state.backend.is_some(),
            "branding": state.branding,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.connect" => Some(handle_connect(state, req)),
        "session.status" => Some(handle_status(state, req)),
        _ => None,
    }
}
