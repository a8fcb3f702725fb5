use serde::{Deserialize, Serialize};

use crate::curriculum;
use crate::error::{GradebookError, Result};

/// One (student, subject) assessment instance.
///
/// `final_grade` is derived from the four scores and is `None` only between
/// an append and the recompute that always follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub student_name: String,
    pub class_label: Option<String>,
    pub subject: String,
    pub assessment_1: Option<f64>,
    pub assessment_2: Option<f64>,
    pub exam_1: Option<f64>,
    pub exam_2: Option<f64>,
    pub final_grade: Option<f64>,
}

/// Raw input for a new record, as supplied by the entry form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub student_name: String,
    #[serde(default)]
    pub class_label: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub assessment_1: Option<f64>,
    #[serde(default)]
    pub assessment_2: Option<f64>,
    #[serde(default)]
    pub exam_1: Option<f64>,
    #[serde(default)]
    pub exam_2: Option<f64>,
}

impl NewRecord {
    pub fn into_record(self) -> ScoreRecord {
        ScoreRecord {
            student_name: self.student_name,
            class_label: self.class_label,
            subject: self.subject,
            assessment_1: self.assessment_1,
            assessment_2: self.assessment_2,
            exam_1: self.exam_1,
            exam_2: self.exam_2,
            final_grade: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub require_class_label: bool,
    pub enforce_curriculum: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            require_class_label: true,
            enforce_curriculum: false,
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn check_text(field: &str, value: &str) -> Result<()> {
    if is_blank(value) {
        return Err(GradebookError::validation(format!(
            "{} cannot be empty",
            field
        )));
    }
    // The table file is line-oriented.
    if value.contains('\n') || value.contains('\r') {
        return Err(GradebookError::validation(format!(
            "{} cannot contain line breaks",
            field
        )));
    }
    Ok(())
}

impl NewRecord {
    pub fn validate(&self, rules: &ValidationRules) -> Result<()> {
        check_text("student name", &self.student_name)?;
        match self.class_label.as_deref() {
            Some(class) => check_text("class", class)?,
            None if rules.require_class_label => {
                return Err(GradebookError::validation("class cannot be empty"));
            }
            None => {}
        }
        check_text("subject", &self.subject)?;

        if rules.enforce_curriculum {
            let class = self.class_label.as_deref().unwrap_or("");
            let Some(category) = curriculum::category_for_class(class) else {
                return Err(GradebookError::validation(format!(
                    "unknown class: {}",
                    class
                )));
            };
            if !category.subjects.contains(&self.subject.as_str()) {
                return Err(GradebookError::validation(format!(
                    "subject {} is not offered to {} classes",
                    self.subject, category.name
                )));
            }
        }
        Ok(())
    }
}
