use std::path::PathBuf;

use serde::Deserialize;

use crate::config::GradebookConfig;
use crate::store::{RecordStore, RecordTable};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The open workspace: its settings, its store and the in-memory table.
pub struct Session {
    pub workspace: PathBuf,
    pub config: GradebookConfig,
    pub store: RecordStore,
    pub table: RecordTable,
}

#[derive(Default)]
pub struct AppState {
    pub session: Option<Session>,
}
