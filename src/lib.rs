//! Score records, weighted final grades and per-subject aggregates for a
//! small school gradebook, served to a UI over line-delimited JSON.

pub mod aggregate;
pub mod backup;
pub mod calc;
pub mod config;
pub mod csv;
pub mod curriculum;
pub mod error;
pub mod ipc;
pub mod logging;
pub mod record;
pub mod report;
pub mod scheme;
pub mod store;

pub use error::{GradebookError, Result};
