use serde_json::json;

use crate::error::GradebookError;
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request, Session};

pub fn session<'a>(state: &'a AppState, req: &Request) -> Result<&'a Session, serde_json::Value> {
    state
        .session
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

pub fn session_mut<'a>(
    state: &'a mut AppState,
    req: &Request,
) -> Result<&'a mut Session, serde_json::Value> {
    state
        .session
        .as_mut()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

/// A string param that must be present; the value is not trimmed.
pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Result<Option<String>, serde_json::Value> {
    match req.params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => v.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("{} must be a string", key),
                None,
            )
        }),
    }
}

/// A score param: absent/null, or a number in [0, 100].
pub fn optional_score(req: &Request, key: &str) -> Result<Option<f64>, serde_json::Value> {
    let bad = |raw: &serde_json::Value| {
        err(
            &req.id,
            "bad_params",
            format!("{} must be a number between 0 and 100", key),
            Some(json!({ key: raw })),
        )
    };
    match req.params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => match v.as_f64() {
            Some(n) if (0.0..=100.0).contains(&n) => Ok(Some(n)),
            _ => Err(bad(v)),
        },
    }
}

pub fn gradebook_err(req: &Request, e: GradebookError) -> serde_json::Value {
    err(&req.id, e.code(), e.to_string(), None)
}
