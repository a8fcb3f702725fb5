use serde::Serialize;

use crate::csv::format_number;
use crate::record::ScoreRecord;

pub const RESULT_SHEET_TITLE: &str = "Student Result Sheet";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSheetEntry {
    pub lines: Vec<ReportLine>,
}

/// Content of a printable result sheet; byte layout belongs to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSheet {
    pub title: &'static str,
    pub student_name: String,
    pub subject: String,
    pub file_name: String,
    pub empty: bool,
    pub entries: Vec<ResultSheetEntry>,
}

fn score_text(v: Option<f64>) -> String {
    v.map(format_number).unwrap_or_else(|| "-".to_string())
}

/// Labeled lines for one record, in the fixed sheet order. `Class` only
/// appears when the record has one.
pub fn report_lines(record: &ScoreRecord) -> Vec<ReportLine> {
    let mut lines = Vec::with_capacity(8);
    lines.push(ReportLine {
        label: "Student Name",
        value: record.student_name.clone(),
    });
    if let Some(class) = &record.class_label {
        lines.push(ReportLine {
            label: "Class",
            value: class.clone(),
        });
    }
    lines.push(ReportLine {
        label: "Subject",
        value: record.subject.clone(),
    });
    for (label, v) in [
        ("Assessment 1 Score", record.assessment_1),
        ("Assessment 2 Score", record.assessment_2),
        ("Exam 1 Score", record.exam_1),
        ("Exam 2 Score", record.exam_2),
        ("Final Grade", record.final_grade),
    ] {
        lines.push(ReportLine {
            label,
            value: score_text(v),
        });
    }
    lines
}

impl ResultSheet {
    pub fn for_records(student_name: &str, subject: &str, records: &[&ScoreRecord]) -> Self {
        Self {
            title: RESULT_SHEET_TITLE,
            student_name: student_name.to_string(),
            subject: subject.to_string(),
            file_name: format!("{}_{}_Result_Report.pdf", student_name, subject),
            empty: records.is_empty(),
            entries: records
                .iter()
                .map(|r| ResultSheetEntry {
                    lines: report_lines(r),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(class: Option<&str>) -> ScoreRecord {
        ScoreRecord {
            student_name: "Ada".to_string(),
            class_label: class.map(str::to_string),
            subject: "Mathematics".to_string(),
            assessment_1: Some(80.0),
            assessment_2: Some(90.0),
            exam_1: Some(70.0),
            exam_2: None,
            final_grade: Some(55.0),
        }
    }

    #[test]
    fn lines_follow_sheet_order() {
        let lines = report_lines(&record(Some("JSS 1")));
        let labels: Vec<_> = lines.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            vec![
                "Student Name",
                "Class",
                "Subject",
                "Assessment 1 Score",
                "Assessment 2 Score",
                "Exam 1 Score",
                "Exam 2 Score",
                "Final Grade"
            ]
        );
        let values: Vec<_> = lines.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["Ada", "JSS 1", "Mathematics", "80.0", "90.0", "70.0", "-", "55.0"]
        );
    }

    #[test]
    fn class_line_is_omitted_without_class() {
        let lines = report_lines(&record(None));
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|l| l.label != "Class"));
    }

    #[test]
    fn sheet_keeps_one_entry_per_record() {
        let a = record(Some("JSS 1"));
        let b = record(Some("JSS 2"));
        let sheet = ResultSheet::for_records("Ada", "Mathematics", &[&a, &b]);
        assert_eq!(sheet.title, "Student Result Sheet");
        assert_eq!(sheet.file_name, "Ada_Mathematics_Result_Report.pdf");
        assert!(!sheet.empty);
        assert_eq!(sheet.entries.len(), 2);
        assert_eq!(sheet.entries[1].lines[1].value, "JSS 2");

        let none = ResultSheet::for_records("Ada", "Physics", &[]);
        assert!(none.empty);
        assert!(none.entries.is_empty());
    }
}
