use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::record::ScoreRecord;
use crate::scheme::GradeScheme;
use crate::store::RecordTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject: String,
    pub average_assessment_1: f64,
    pub average_assessment_2: f64,
    pub average_exam_1: f64,
    pub average_exam_2: f64,
    pub average_final_grade: f64,
    pub number_of_students: usize,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDistribution {
    pub subject: String,
    pub bands: Vec<BandCount>,
    /// Records whose grade fell outside every band.
    pub unbanded: usize,
}

impl SubjectDistribution {
    pub fn count(&self, label: &str) -> Option<usize> {
        self.bands.iter().find(|b| b.label == label).map(|b| b.count)
    }
}

/// Groups records by exact subject, in order of first appearance.
fn group_by_subject(table: &RecordTable) -> Vec<(&str, Vec<&ScoreRecord>)> {
    let mut slot_by_subject: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&ScoreRecord>)> = Vec::new();
    for r in table.records() {
        let slot = *slot_by_subject.entry(r.subject.as_str()).or_insert_with(|| {
            groups.push((r.subject.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(r);
    }
    groups
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / (n as f64)
    }
}

fn value(v: Option<f64>) -> f64 {
    v.unwrap_or(0.0)
}

/// Per-subject means and distinct-student counts.
///
/// Absent scores count as 0 in the means, matching how they were graded.
/// An empty table yields an empty list.
pub fn summarize_by_subject(table: &RecordTable) -> Vec<SubjectSummary> {
    group_by_subject(table)
        .into_iter()
        .map(|(subject, rows)| {
            let students: HashSet<&str> = rows.iter().map(|r| r.student_name.as_str()).collect();
            SubjectSummary {
                subject: subject.to_string(),
                average_assessment_1: mean(rows.iter().map(|r| value(r.assessment_1))),
                average_assessment_2: mean(rows.iter().map(|r| value(r.assessment_2))),
                average_exam_1: mean(rows.iter().map(|r| value(r.exam_1))),
                average_exam_2: mean(rows.iter().map(|r| value(r.exam_2))),
                average_final_grade: mean(rows.iter().map(|r| value(r.final_grade))),
                number_of_students: students.len(),
                record_count: rows.len(),
            }
        })
        .collect()
}

/// Counts final grades per band for every subject.
///
/// Fails with a configuration error when `labels.len() != bins.len() - 1`
/// or `bins` is not strictly ascending.
pub fn grade_distribution(
    table: &RecordTable,
    bins: &[f64],
    labels: &[String],
) -> Result<Vec<SubjectDistribution>> {
    let scheme = GradeScheme::new("custom", bins.to_vec(), labels.to_vec())?;
    Ok(distribution_for_scheme(table, &scheme))
}

pub fn distribution_for_scheme(
    table: &RecordTable,
    scheme: &GradeScheme,
) -> Vec<SubjectDistribution> {
    group_by_subject(table)
        .into_iter()
        .map(|(subject, rows)| {
            let mut counts = vec![0usize; scheme.labels.len()];
            let mut unbanded = 0usize;
            for r in rows {
                match r.final_grade.and_then(|g| scheme.band_index(g)) {
                    Some(i) => counts[i] += 1,
                    None => unbanded += 1,
                }
            }
            SubjectDistribution {
                subject: subject.to_string(),
                bands: scheme
                    .labels
                    .iter()
                    .zip(counts)
                    .map(|(label, count)| BandCount {
                        label: label.clone(),
                        count,
                    })
                    .collect(),
                unbanded,
            }
        })
        .collect()
}
