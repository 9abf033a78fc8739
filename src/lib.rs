// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! MiniCoder - a terminal chat client for Gemini models.
//!
//! Architecture highlights:
//! - `cli`: raw argument parsing and the process-level entry point
//! - `commands`: command trait, registry and dispatcher plus the built-in commands
//! - `chat`: the interactive session loop and its input/presentation seams
//! - `llm`: backend abstraction and the Gemini HTTP client
//! - `ui`: terminal formatting (boxes, bubbles, markdown to ANSI, spinner)
//! - `config`: layered settings loading and explicit persistence

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod llm;
pub mod ui;

pub use error::{BackendError, MiniError, Result};
