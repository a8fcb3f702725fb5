use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::calc;
use crate::csv::{csv_quote, format_optional_number, parse_csv_record};
use crate::error::{GradebookError, Result};
use crate::record::{NewRecord, ScoreRecord, ValidationRules};

/// Header of the table file, in canonical column order.
pub const TABLE_COLUMNS: [&str; 8] = [
    "Student_Name",
    "Class",
    "Subject",
    "Assessment_1",
    "Assessment_2",
    "Exam_1",
    "Exam_2",
    "Final_Grade",
];

/// Ordered score records; insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<ScoreRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ScoreRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every row for the exact (student, subject) pair, in table order.
    pub fn lookup(&self, student_name: &str, subject: &str) -> Vec<&ScoreRecord> {
        self.records
            .iter()
            .filter(|r| r.student_name == student_name && r.subject == subject)
            .collect()
    }

    /// Distinct student names in first-seen order.
    pub fn student_names(&self) -> Vec<&str> {
        distinct_in_order(self.records.iter().map(|r| r.student_name.as_str()))
    }

    /// Distinct subjects in first-seen order.
    pub fn subjects(&self) -> Vec<&str> {
        distinct_in_order(self.records.iter().map(|r| r.subject.as_str()))
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// Validates `input` and returns a new table with it appended.
///
/// The new row has no final grade yet; use [`commit_append`] to append,
/// grade and persist in one step.
pub fn append(
    table: &RecordTable,
    input: NewRecord,
    rules: &ValidationRules,
) -> Result<RecordTable> {
    input.validate(rules)?;
    let mut records = table.records.clone();
    records.push(input.into_record());
    Ok(RecordTable::from_records(records))
}

/// Append, recompute every final grade, then persist.
///
/// The returned table is the new session table; on any error the caller's
/// table is untouched and nothing has been written.
pub fn commit_append(
    store: &RecordStore,
    table: &RecordTable,
    input: NewRecord,
    rules: &ValidationRules,
) -> Result<RecordTable> {
    let appended = match append(table, input, rules) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "append rejected");
            return Err(e);
        }
    };
    let graded = calc::recompute_all(appended);
    store.save(&graded)?;
    Ok(graded)
}

/// Durable home of one record table: a CSV file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the table; a missing file is a first run and yields an empty
    /// table. Final grades are always re-derived from the stored scores.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<RecordTable> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("no table file yet, starting empty");
                return Ok(RecordTable::new());
            }
            Err(e) => return Err(GradebookError::storage(&self.path, e)),
        };
        let table = calc::recompute_all(parse_table(&self.path, &text)?);
        tracing::info!(records = table.len(), "loaded record table");
        Ok(table)
    }

    /// Replaces the file contents with `table`.
    #[tracing::instrument(skip(self, table), fields(path = %self.path.display(), records = table.len()))]
    pub fn save(&self, table: &RecordTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| GradebookError::storage(parent, e))?;
            }
        }

        let tmp = saving_path(&self.path);
        std::fs::write(&tmp, render_table(table))
            .map_err(|e| GradebookError::storage(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| GradebookError::storage(&self.path, e))?;
        tracing::debug!("saved record table");
        Ok(())
    }
}

fn saving_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".saving");
    path.with_file_name(name)
}

pub fn render_table(table: &RecordTable) -> String {
    let mut out = TABLE_COLUMNS.join(",");
    out.push('\n');
    for r in table.records() {
        let cells = [
            csv_quote(&r.student_name),
            csv_quote(r.class_label.as_deref().unwrap_or("")),
            csv_quote(&r.subject),
            format_optional_number(r.assessment_1),
            format_optional_number(r.assessment_2),
            format_optional_number(r.exam_1),
            format_optional_number(r.exam_2),
            format_optional_number(r.final_grade),
        ];
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn parse_score_cell(raw: &str, column: &str) -> std::result::Result<Option<f64>, String> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(None);
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("{} is not a number ({:?})", column, t)),
    }
}

fn parse_table(path: &Path, text: &str) -> Result<RecordTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().enumerate();
    let Some((_, header_line)) = lines.find(|(_, l)| !l.trim().is_empty()) else {
        return Ok(RecordTable::new());
    };

    let mut idx = HashMap::<String, usize>::new();
    for (i, f) in parse_csv_record(header_line).into_iter().enumerate() {
        idx.entry(f.trim().to_ascii_lowercase()).or_insert(i);
    }
    let col = |name: &str| idx.get(&name.to_ascii_lowercase()).copied();
    let required = |name: &str| {
        col(name).ok_or_else(|| GradebookError::MalformedTable {
            path: path.to_path_buf(),
            message: format!("header is missing column {}", name),
        })
    };

    let name_col = required("Student_Name")?;
    let subject_col = required("Subject")?;
    let a1_col = required("Assessment_1")?;
    let a2_col = required("Assessment_2")?;
    let e1_col = required("Exam_1")?;
    let e2_col = required("Exam_2")?;
    let class_col = col("Class");
    let final_col = col("Final_Grade");

    let mut records = Vec::new();
    let mut problems = Vec::new();
    for (i, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = i + 1;
        let fields = parse_csv_record(line);
        let cell = |c: usize| fields.get(c).map(String::as_str).unwrap_or("");

        let student_name = cell(name_col).to_string();
        let subject = cell(subject_col).to_string();
        if student_name.trim().is_empty() || subject.trim().is_empty() {
            problems.push(format!("line {}: missing student name or subject", line_no));
            continue;
        }
        let class_label = class_col
            .map(cell)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut scores = [None; 4];
        let mut row_ok = true;
        for (slot, (c, name)) in scores.iter_mut().zip([
            (a1_col, "Assessment_1"),
            (a2_col, "Assessment_2"),
            (e1_col, "Exam_1"),
            (e2_col, "Exam_2"),
        ]) {
            match parse_score_cell(cell(c), name) {
                Ok(v) => *slot = v,
                Err(message) => {
                    problems.push(format!("line {}: {}", line_no, message));
                    row_ok = false;
                }
            }
        }
        if !row_ok {
            continue;
        }
        let [assessment_1, assessment_2, exam_1, exam_2] = scores;

        records.push(ScoreRecord {
            student_name,
            class_label,
            subject,
            assessment_1,
            assessment_2,
            exam_1,
            exam_2,
            // Derived; recomputed after load.
            final_grade: final_col.and_then(|c| cell(c).trim().parse::<f64>().ok()),
        });
    }

    // One unreadable row fails the whole load; nothing is dropped silently.
    if !problems.is_empty() {
        tracing::warn!(rows = problems.len(), "table file has unreadable rows");
        return Err(GradebookError::MalformedTable {
            path: path.to_path_buf(),
            message: problems.join("; "),
        });
    }
    Ok(RecordTable::from_records(records))
}
