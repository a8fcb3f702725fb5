use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GradebookError, Result};
use crate::record::ValidationRules;
use crate::scheme::{self, GradeScheme};

pub const CONFIG_FILE: &str = "gradebook.json";
pub const DEFAULT_DATA_FILE: &str = "student_data.csv";

/// Per-workspace settings, read from `gradebook.json` when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GradebookConfig {
    pub data_file: String,
    pub require_class_label: bool,
    pub enforce_curriculum: bool,
    pub default_scheme: String,
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            require_class_label: true,
            enforce_curriculum: false,
            default_scheme: scheme::WAEC.to_string(),
        }
    }
}

impl GradebookConfig {
    pub fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join(CONFIG_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(GradebookError::storage(&path, e)),
        };
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            GradebookError::configuration(format!("{} is invalid: {}", CONFIG_FILE, e))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let file = Path::new(&self.data_file);
        if self.data_file.trim().is_empty()
            || file.components().count() != 1
            || file.file_name().is_none()
        {
            return Err(GradebookError::configuration(
                "dataFile must be a plain file name inside the workspace",
            ));
        }
        if GradeScheme::preset(&self.default_scheme).is_none() {
            return Err(GradebookError::configuration(format!(
                "unknown defaultScheme: {}",
                self.default_scheme
            )));
        }
        Ok(())
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            require_class_label: self.require_class_label,
            enforce_curriculum: self.enforce_curriculum,
        }
    }

    pub fn default_grade_scheme(&self) -> GradeScheme {
        GradeScheme::preset(&self.default_scheme).unwrap_or_else(GradeScheme::waec)
    }
}
