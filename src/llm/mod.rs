// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM module for MiniCoder
//!
//! Provides the chat backend abstraction and its implementations.

pub mod backend;
pub mod gemini;
pub mod message;
pub mod mock;

pub use backend::*;
pub use gemini::GeminiClient;
pub use message::*;
pub use mock::{MockBackend, MockCall};
