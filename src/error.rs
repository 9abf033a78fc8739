// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for MiniCoder
//!
//! This module defines all error types used throughout the application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for MiniCoder operations
#[derive(Error, Debug)]
pub enum MiniError {
    /// A command was invoked without its required input
    #[error("{0}")]
    Usage(String),

    /// No command is registered under the requested name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Configuration errors, including a backend that cannot be constructed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing a configuration file failed
    #[error("Failed to save configuration to {}: {source}", path.display())]
    ConfigPersistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Single-shot generation failed
    #[error("Generation failed: {0}")]
    Generation(#[source] BackendError),

    /// Backend call errors that escape a command
    #[error("API error: {0}")]
    Backend(#[from] BackendError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a single backend call.
///
/// The chat loop treats every variant the same way (render, roll back, continue);
/// the variants exist so messages can tell the cases apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The prompt was blocked by the content-safety filter
    #[error("Content blocked: {reason}")]
    Blocked { reason: String },

    /// No candidate and no block reason
    #[error("API returned an empty response")]
    EmptyResponse,

    /// Non-success HTTP status; the raw body is kept verbatim
    #[error("API request failed ({status}): {body}")]
    Status { status: u16, body: String },

    /// Connectivity failure below the application layer
    #[error("Network error: {0}. Check your network connection or proxy settings")]
    Network(String),

    /// Response body did not have the expected shape
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The operator interrupted the pending call
    #[error("Request interrupted")]
    Interrupted,
}

impl BackendError {
    /// HTTP status code, when the failure carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::InvalidResponse(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

/// Result type alias for MiniCoder operations
pub type Result<T> = std::result::Result<T, MiniError>;
