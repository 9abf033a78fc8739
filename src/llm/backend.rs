// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat backend trait
//!
//! Defines the two calls the chat core needs from a remote model. Both return
//! an explicit `BackendError` kind so callers can match on the failure instead
//! of intercepting a generic error.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::llm::message::ChatMessage;

/// Result of a single backend call
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Remote model capable of single-turn and multi-turn generation
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Single-turn generation from one user prompt
    async fn generate(&self, prompt: &str) -> BackendResult<String>;

    /// Multi-turn completion over the whole history, with an optional
    /// system instruction kept separate from the turns
    async fn chat(
        &self,
        history: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> BackendResult<String>;
}
