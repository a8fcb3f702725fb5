use crate::config::GradebookConfig;
use crate::error::{GradebookError, Result};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::gradebook_err;
use crate::ipc::types::{AppState, Request, Session};
use crate::store::RecordStore;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Reads the workspace config and loads its table.
pub fn open_session(workspace: &Path) -> Result<Session> {
    std::fs::create_dir_all(workspace)
        .map_err(|e| GradebookError::storage(workspace, e))?;
    let config = GradebookConfig::load(workspace)?;
    let store = RecordStore::new(workspace.join(&config.data_file));
    let table = store.load()?;
    tracing::info!(
        workspace = %workspace.display(),
        data_file = %config.data_file,
        records = table.len(),
        "workspace opened"
    );
    Ok(Session {
        workspace: workspace.to_path_buf(),
        config,
        store,
        table,
    })
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state
                .session
                .as_ref()
                .map(|s| s.workspace.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match open_session(&path) {
        Ok(session) => {
            let result = json!({
                "workspacePath": path.to_string_lossy(),
                "dataFile": session.config.data_file,
                "recordCount": session.table.len(),
            });
            state.session = Some(session);
            ok(&req.id, result)
        }
        Err(e) => {
            // The previous session, if any, stays open.
            tracing::warn!(workspace = %path.display(), error = %e, "workspace open failed");
            gradebook_err(req, e)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
