use crate::ipc::error::ok;
use crate::ipc::helpers::{required_str, session};
use crate::ipc::types::{AppState, Request};
use crate::report::ResultSheet;
use serde_json::json;

fn handle_reports_result_sheet(state: &mut AppState, req: &Request) -> serde_json::Value {
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
    let sheet = ResultSheet::for_records(&student_name, &subject, &records);
    ok(&req.id, json!(sheet))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.resultSheet" => Some(handle_reports_result_sheet(state, req)),
        _ => None,
    }
}
