use std::collections::HashSet;

use serde::Serialize;

use crate::error::{GradebookError, Result};

pub const LETTER: &str = "letter";
pub const WAEC: &str = "waec";

/// Validated grade bands: `labels[i]` covers `[bins[i], bins[i + 1])`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeScheme {
    pub name: String,
    pub bins: Vec<f64>,
    pub labels: Vec<String>,
}

impl GradeScheme {
    pub fn new(name: impl Into<String>, bins: Vec<f64>, labels: Vec<String>) -> Result<Self> {
        if bins.len() < 2 {
            return Err(GradebookError::configuration(
                "bins must have at least two edges",
            ));
        }
        if labels.len() != bins.len() - 1 {
            return Err(GradebookError::configuration(format!(
                "expected {} labels for {} bin edges, got {}",
                bins.len() - 1,
                bins.len(),
                labels.len()
            )));
        }
        if bins.iter().any(|b| !b.is_finite()) {
            return Err(GradebookError::configuration("bin edges must be finite"));
        }
        if bins.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GradebookError::configuration(
                "bin edges must be strictly ascending",
            ));
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if label.trim().is_empty() {
                return Err(GradebookError::configuration("labels cannot be empty"));
            }
            if !seen.insert(label.as_str()) {
                return Err(GradebookError::configuration(format!(
                    "duplicate label: {}",
                    label
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            bins,
            labels,
        })
    }

    /// `F, D, C, B, A, A+` on 10-point bands from 50.
    pub fn letter() -> Self {
        build_preset(
            LETTER,
            &[0.0, 50.0, 60.0, 70.0, 80.0, 90.0, 101.0],
            &["F", "D", "C", "B", "A", "A+"],
        )
    }

    /// WAEC-style `F9, E8, D7, C, B, A`.
    pub fn waec() -> Self {
        build_preset(
            WAEC,
            &[0.0, 39.0, 44.0, 50.0, 60.0, 70.0, 101.0],
            &["F9", "E8", "D7", "C", "B", "A"],
        )
    }

    pub fn presets() -> Vec<Self> {
        vec![Self::letter(), Self::waec()]
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            LETTER => Some(Self::letter()),
            WAEC => Some(Self::waec()),
            _ => None,
        }
    }

    /// Index of the band containing `grade`; `None` below the first edge,
    /// at or above the last one, or for NaN.
    pub fn band_index(&self, grade: f64) -> Option<usize> {
        self.bins
            .windows(2)
            .position(|w| grade >= w[0] && grade < w[1])
    }

    pub fn band_for(&self, grade: f64) -> Option<&str> {
        self.band_index(grade).map(|i| self.labels[i].as_str())
    }
}

fn build_preset(name: &str, bins: &[f64], labels: &[&str]) -> GradeScheme {
    GradeScheme {
        name: name.to_string(),
        bins: bins.to_vec(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}
