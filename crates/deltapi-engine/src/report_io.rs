//! Report persistence

use crate::error::{EngineError, EngineResult};
use deltapi_core::Report;
use std::fs;
use std::path::Path;
use tracing::info;

/// Write a report as pretty-printed JSON
pub fn save_report(report: &Report, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    info!(path = %path.display(), "Writing report");

    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).map_err(|e| EngineError::WriteReport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a report written by [`save_report`]
pub fn load_report(path: impl AsRef<Path>) -> EngineResult<Report> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| EngineError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}
