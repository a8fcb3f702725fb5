use crate::aggregate;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{gradebook_err, session};
use crate::ipc::types::{AppState, Request, Session};
use crate::scheme::GradeScheme;
use serde_json::json;

fn parse_number_list(req: &Request, key: &str) -> Result<Vec<f64>, serde_json::Value> {
    let bad = || {
        err(
            &req.id,
            "bad_params",
            format!("{} must be an array of numbers", key),
            None,
        )
    };
    let Some(items) = req.params.get(key).and_then(|v| v.as_array()) else {
        return Err(bad());
    };
    items.iter().map(|v| v.as_f64().ok_or_else(bad)).collect()
}

fn parse_string_list(req: &Request, key: &str) -> Result<Vec<String>, serde_json::Value> {
    let bad = || {
        err(
            &req.id,
            "bad_params",
            format!("{} must be an array of strings", key),
            None,
        )
    };
    let Some(items) = req.params.get(key).and_then(|v| v.as_array()) else {
        return Err(bad());
    };
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(bad))
        .collect()
}

/// `scheme` names a preset; `bins` + `labels` give custom bands; neither
/// falls back to the workspace default.
fn resolve_scheme(session: &Session, req: &Request) -> Result<GradeScheme, serde_json::Value> {
    let has_custom = req.params.get("bins").is_some() || req.params.get("labels").is_some();
    match req.params.get("scheme").and_then(|v| v.as_str()) {
        Some(_) if has_custom => Err(err(
            &req.id,
            "bad_params",
            "pass either scheme or bins/labels, not both",
            None,
        )),
        Some(name) => GradeScheme::preset(name).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("unknown scheme: {}", name),
                Some(json!({ "known": [crate::scheme::LETTER, crate::scheme::WAEC] })),
            )
        }),
        None if has_custom => {
            let bins = parse_number_list(req, "bins")?;
            let labels = parse_string_list(req, "labels")?;
            GradeScheme::new("custom", bins, labels).map_err(|e| gradebook_err(req, e))
        }
        None => Ok(session.config.default_grade_scheme()),
    }
}

fn handle_summary_by_subject(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = match session(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let subjects = aggregate::summarize_by_subject(&session.table);
    ok(
        &req.id,
        json!({
            "empty": subjects.is_empty(),
            "subjects": subjects,
        }),
    )
}

fn handle_summary_distribution(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = match session(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scheme = match resolve_scheme(session, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let subjects = aggregate::distribution_for_scheme(&session.table, &scheme);
    ok(
        &req.id,
        json!({
            "scheme": scheme,
            "labels": scheme.labels,
            "empty": subjects.is_empty(),
            "subjects": subjects,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "summary.bySubject" => Some(handle_summary_by_subject(state, req)),
        "summary.distribution" => Some(handle_summary_distribution(state, req)),
        _ => None,
    }
}
