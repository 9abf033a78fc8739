// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for MiniCoder
//!
//! Settings are layered from `MINICODER_*` environment variables, then
//! `~/.minicoderrc.json`, then `<project>/.minicoderrc.json`. Later layers
//! override earlier ones key by key, so a saved file wins over the
//! environment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{MiniError, Result};

mod io;
mod merge;

/// File name used for both the user and the project configuration
pub const CONFIG_FILE_NAME: &str = ".minicoderrc.json";

/// Value `mini init` stores when no key is entered
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Environment variables and the setting keys they provide
pub const ENV_VARS: &[(&str, &str)] = &[
    ("MINICODER_API_KEY", "apiKey"),
    ("MINICODER_MODEL", "model"),
    ("MINICODER_PROXY", "proxy"),
    ("MINICODER_NO_PROXY", "noProxy"),
];

/// MiniCoder settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Gemini API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// HTTP(S) proxy URL for backend requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// Comma-separated hosts that bypass the proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_proxy: Option<String>,

    /// Project root; the project config file lives here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// File whose content is sent as the system instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_path: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Keys this version does not know about, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    user_dir: Option<PathBuf>,

    #[serde(skip)]
    working_dir: Option<PathBuf>,
}

impl Settings {
    /// Settings holding only an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Load settings from the user directory, the current directory and the
    /// process environment.
    pub fn load() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_layered(&Self::minicoder_home(), &cwd, |var| std::env::var(var).ok())
    }

    /// Load settings from explicit sources.
    ///
    /// `env` looks up an environment variable; empty values are ignored.
    pub fn load_layered<F>(user_dir: &Path, cwd: &Path, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = Map::new();

        for (var, key) in ENV_VARS {
            if let Some(value) = env(var).filter(|v| !v.is_empty()) {
                merged.insert((*key).to_string(), Value::String(value));
            }
        }

        if let Some(layer) = io::read_layer(&user_dir.join(CONFIG_FILE_NAME)) {
            merge::overlay(&mut merged, layer);
        }

        let project_dir = merged
            .get("projectRoot")
            .and_then(Value::as_str)
            .map(|root| cwd.join(root))
            .unwrap_or_else(|| cwd.to_path_buf());

        if let Some(layer) = io::read_layer(&project_dir.join(CONFIG_FILE_NAME)) {
            merge::overlay(&mut merged, layer);
        }

        let mut settings = match serde_json::from_value::<Settings>(Value::Object(merged)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    target: "minicoder.config",
                    error = %e,
                    "merged configuration is invalid, using defaults"
                );
                Settings::default()
            }
        };
        settings.user_dir = Some(user_dir.to_path_buf());
        settings.working_dir = Some(cwd.to_path_buf());

        tracing::debug!(
            target: "minicoder.config",
            has_api_key = settings.has_api_key(),
            model = settings.model.as_deref().unwrap_or("<default>"),
            proxy = settings.proxy.is_some(),
            "settings loaded"
        );

        settings
    }

    /// The MiniCoder home directory (`$MINICODER_HOME` or the user's home)
    pub fn minicoder_home() -> PathBuf {
        if let Ok(home) = std::env::var("MINICODER_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Path of the user-level config file
    pub fn user_config_path(&self) -> PathBuf {
        self.user_dir
            .clone()
            .unwrap_or_else(Self::minicoder_home)
            .join(CONFIG_FILE_NAME)
    }

    /// Directory the project config and relative paths resolve against
    pub fn project_dir(&self) -> PathBuf {
        let cwd = self
            .working_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        match self.project_root {
            Some(ref root) => cwd.join(root),
            None => cwd,
        }
    }

    /// Path of the project-level config file
    pub fn project_config_path(&self) -> PathBuf {
        self.project_dir().join(CONFIG_FILE_NAME)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn no_proxy(&self) -> Option<&str> {
        self.no_proxy.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = Some(model.into());
    }

    pub fn set_proxy(&mut self, proxy: Option<String>) {
        self.proxy = proxy;
    }

    /// Whether a usable API key is configured (the init placeholder is not)
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty() && key != PLACEHOLDER_API_KEY)
            .unwrap_or(false)
    }

    /// Read the configured system prompt file, if any.
    pub fn system_prompt(&self) -> Result<Option<String>> {
        let Some(ref relative) = self.system_prompt_path else {
            return Ok(None);
        };
        let path = self.project_dir().join(relative);
        std::fs::read_to_string(&path).map(Some).map_err(|e| {
            MiniError::Config(format!(
                "Cannot read system prompt file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save to the user-level config file
    pub fn save_to_user(&self) -> Result<PathBuf> {
        let path = self.user_config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to the project-level config file
    pub fn save_to_project(&self) -> Result<PathBuf> {
        let path = self.project_config_path();
        self.save_to(&path)?;
        Ok(path)
    }
}
