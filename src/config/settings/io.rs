// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{MiniError, Result};

use super::merge;
use super::Settings;

/// Read one configuration layer.
///
/// Missing files yield `None` silently; unreadable or invalid files are
/// skipped with a warning.
pub(super) fn read_layer(path: &Path) -> Option<Map<String, Value>> {
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                target: "minicoder.config",
                path = %path.display(),
                error = %e,
                "cannot read config file"
            );
            return None;
        }
    };

    let layer = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!(
                target: "minicoder.config",
                path = %path.display(),
                "config file is not a JSON object"
            );
            return None;
        }
        Err(e) => {
            tracing::warn!(
                target: "minicoder.config",
                path = %path.display(),
                error = %e,
                "config file is not valid JSON"
            );
            return None;
        }
    };

    // A layer with a wrongly typed known key would poison the merged result.
    if let Err(e) = serde_json::from_value::<Settings>(Value::Object(layer.clone())) {
        tracing::warn!(
            target: "minicoder.config",
            path = %path.display(),
            error = %e,
            "config file has invalid values"
        );
        return None;
    }

    tracing::debug!(target: "minicoder.config", path = %path.display(), "config file loaded");
    Some(layer)
}

impl Settings {
    /// Save settings to a specific path as pretty JSON.
    ///
    /// Keys already present in the target file and absent here are kept.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let persistence = |source: std::io::Error| MiniError::ConfigPersistence {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(persistence)?;
            }
        }

        let mut merged = match std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
        {
            Some(Value::Object(existing)) => existing,
            // Missing or corrupt file, overwrite entirely.
            _ => Map::new(),
        };

        if let Value::Object(current) = serde_json::to_value(self)? {
            merge::overlay(&mut merged, current);
        }

        let content = serde_json::to_string_pretty(&Value::Object(merged))?;
        std::fs::write(path, content).map_err(persistence)?;

        tracing::debug!(target: "minicoder.config", path = %path.display(), "settings saved");
        Ok(())
    }
}
