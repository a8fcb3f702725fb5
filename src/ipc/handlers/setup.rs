use crate::curriculum;
use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::scheme::GradeScheme;
use serde_json::json;

fn handle_grading_schemes(state: &mut AppState, req: &Request) -> serde_json::Value {
    let default_scheme = state
        .session
        .as_ref()
        .map(|s| s.config.default_scheme.clone());
    ok(
        &req.id,
        json!({
            "schemes": GradeScheme::presets(),
            "defaultScheme": default_scheme,
        }),
    )
}

fn handle_curriculum_options(state: &mut AppState, req: &Request) -> serde_json::Value {
    let enforced = state
        .session
        .as_ref()
        .map(|s| s.config.enforce_curriculum)
        .unwrap_or(false);
    ok(
        &req.id,
        json!({
            "categories": curriculum::categories(),
            "enforced": enforced,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grading.schemes" => Some(handle_grading_schemes(state, req)),
        "curriculum.options" => Some(handle_curriculum_options(state, req)),
        _ => None,
    }
}
