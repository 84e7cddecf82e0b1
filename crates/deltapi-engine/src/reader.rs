//! Action file reader

use crate::error::{EngineError, EngineResult};
use crate::parser::parse_actions;
use deltapi_core::Action;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Read every action from an action file
///
/// A missing or unreadable file is fatal. Malformed lines are logged and
/// skipped so the remaining actions still load.
pub fn read_actions(path: impl AsRef<Path>) -> EngineResult<Vec<Action>> {
    let path = path.as_ref();
    if !path.exists() {
        error!(path = %path.display(), "Action file not found");
        return Err(EngineError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    info!(path = %path.display(), "Reading actions");
    let content = fs::read_to_string(path).map_err(|e| EngineError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let actions: Vec<Action> = parse_actions(content.lines())
        .filter_map(|result| match result {
            Ok(action) => Some(action),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Skipping malformed action line");
                None
            }
        })
        .collect();

    info!(path = %path.display(), count = actions.len(), "Read actions");
    Ok(actions)
}

/// Read several action files and concatenate their actions in order
pub fn read_all<P: AsRef<Path>>(paths: &[P]) -> EngineResult<Vec<Action>> {
    let mut actions = Vec::new();
    for path in paths {
        actions.extend(read_actions(path)?);
    }
    Ok(actions)
}
