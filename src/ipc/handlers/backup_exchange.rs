use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{gradebook_err, session_mut};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_backup_export_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = match req.params.get("outPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing outPath", None),
    };
    let session = match session_mut(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    // A workspace with no appends yet has no table file.
    if let Err(e) = session.store.save(&session.table) {
        return gradebook_err(req, e);
    }

    let out = PathBuf::from(&out_path);
    let export = match backup::export_workspace_bundle(
        &session.workspace,
        &session.config.data_file,
        session.table.len(),
        &out,
    ) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "io_failed",
                e.to_string(),
                Some(json!({ "path": out_path })),
            )
        }
    };
    tracing::info!(path = %out_path, records = session.table.len(), "workspace bundle exported");

    ok(
        &req.id,
        json!({
            "path": out_path,
            "bundleFormat": export.bundle_format,
            "entryCount": export.entry_count,
            "sha256": export.sha256,
            "recordCount": session.table.len(),
        }),
    )
}

fn handle_backup_import_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let in_path = match req.params.get("inPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing inPath", None),
    };
    let session = match session_mut(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let src = PathBuf::from(&in_path);
    if !src.is_file() {
        return err(
            &req.id,
            "not_found",
            "bundle file not found",
            Some(json!({ "path": in_path })),
        );
    }

    let import = match backup::import_workspace_bundle(
        &src,
        &session.workspace,
        &session.config.data_file,
    ) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "io_failed",
                e.to_string(),
                Some(json!({ "path": src.to_string_lossy() })),
            )
        }
    };

    match session.store.load() {
        Ok(table) => {
            // Imported files may carry stale final grades.
            if let Err(e) = session.store.save(&table) {
                return gradebook_err(req, e);
            }
            session.table = table;
            tracing::info!(
                path = %in_path,
                records = session.table.len(),
                "workspace bundle imported"
            );
            ok(
                &req.id,
                json!({
                    "bundleFormatDetected": import.bundle_format_detected,
                    "recordCount": session.table.len(),
                }),
            )
        }
        Err(e) => {
            // Put the session table back on disk; the import is rejected.
            if let Err(restore) = session.store.save(&session.table) {
                tracing::error!(error = %restore, "failed to restore table after bad import");
            }
            gradebook_err(req, e)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.exportWorkspaceBundle" => Some(handle_backup_export_workspace_bundle(state, req)),
        "backup.importWorkspaceBundle" => Some(handle_backup_import_workspace_bundle(state, req)),
        _ => None,
    }
}
