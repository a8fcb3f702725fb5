use crate::record::ScoreRecord;
use crate::store::RecordTable;

pub const ASSESSMENT_WEIGHT: f64 = 0.40;
pub const EXAM_WEIGHT: f64 = 0.60;

/// 2-decimal rounding, halves away from zero: `round(100*x) / 100`.
pub fn round_to_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn score_or_zero(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

/// Weighted final grade: assessments average 40%, exams average 60%.
///
/// Absent scores count as 0. Ranges are not checked; callers constrain
/// scores to [0, 100] before they reach the table.
pub fn compute_final_grade(record: &ScoreRecord) -> f64 {
    let assessment_1 = score_or_zero(record.assessment_1);
    let assessment_2 = score_or_zero(record.assessment_2);
    let exam_1 = score_or_zero(record.exam_1);
    let exam_2 = score_or_zero(record.exam_2);

    let avg_assessment = (assessment_1 + assessment_2) / 2.0;
    let avg_exam = (exam_1 + exam_2) / 2.0;

    round_to_2_decimals(avg_assessment * ASSESSMENT_WEIGHT + avg_exam * EXAM_WEIGHT)
}

/// Re-derives `final_grade` for every record.
pub fn recompute_all(table: RecordTable) -> RecordTable {
    let records = table
        .into_records()
        .into_iter()
        .map(|mut r| {
            r.final_grade = Some(compute_final_grade(&r));
            r
        })
        .collect();
    RecordTable::from_records(records)
}
