use serde_json::json;

use crate::backend::BackendError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Mutating-action failures surface as a generic notification; the HTTP
/// status rides along in details when the backend supplied one.
pub fn backend_err(id: &str, e: BackendError) -> serde_json::Value {
    let details = e.status.map(|s| json!({ "status": s }));
    err(id, "backend_error", e.to_string(), details)
}
