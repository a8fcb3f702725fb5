use crate::ipc::error::ok;
use crate::ipc::helpers::{
    gradebook_err, optional_score, optional_str, required_str, session, session_mut,
};
use crate::ipc::types::{AppState, Request};
use crate::record::NewRecord;
use crate::store;
use serde_json::json;

fn parse_new_record(req: &Request) -> Result<NewRecord, serde_json::Value> {
    Ok(NewRecord {
        student_name: optional_str(req, "studentName")?.unwrap_or_default(),
        class_label: optional_str(req, "classLabel")?,
        subject: optional_str(req, "subject")?.unwrap_or_default(),
        assessment_1: optional_score(req, "assessment1")?,
        assessment_2: optional_score(req, "assessment2")?,
        exam_1: optional_score(req, "exam1")?,
        exam_2: optional_score(req, "exam2")?,
    })
}

fn handle_records_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = match session(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!({
            "records": session.table.records(),
            "count": session.table.len(),
        }),
    )
}

fn handle_records_append(state: &mut AppState, req: &Request) -> serde_json::Value {
    let input = match parse_new_record(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let session = match session_mut(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let rules = session.config.validation_rules();

    match store::commit_append(&session.store, &session.table, input, &rules) {
        Ok(table) => {
            session.table = table;
            let record = session.table.records().last().cloned();
            tracing::info!(records = session.table.len(), "record appended");
            ok(
                &req.id,
                json!({
                    "record": record,
                    "count": session.table.len(),
                }),
            )
        }
        Err(e) => gradebook_err(req, e),
    }
}

fn handle_records_lookup(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = match session(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_name = match required_str(req, "studentName") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let subject = match required_str(req, "subject") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let records = session.table.lookup(&student_name, &subject);
    ok(
        &req.id,
        json!({
            "studentName": student_name,
            "subject": subject,
            "empty": records.is_empty(),
            "records": records,
        }),
    )
}

fn handle_records_options(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = match session(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!({
            "students": session.table.student_names(),
            "subjects": session.table.subjects(),
            "empty": session.table.is_empty(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "records.list" => Some(handle_records_list(state, req)),
        "records.append" => Some(handle_records_append(state, req)),
        "records.lookup" => Some(handle_records_lookup(state, req)),
        "records.options" => Some(handle_records_options(state, req)),
        _ => None,
    }
}
