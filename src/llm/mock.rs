// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Scripted backend for testing

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::llm::backend::{BackendResult, ChatBackend};
use crate::llm::message::ChatMessage;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Generate {
        prompt: String,
    },
    Chat {
        history: Vec<ChatMessage>,
        system_prompt: Option<String>,
    },
}

/// Backend that replays queued replies in order and records every call.
///
/// When the queue runs dry each call fails with `EmptyResponse`.
#[derive(Debug)]
pub struct MockBackend {
    model: String,
    replies: Mutex<VecDeque<BackendResult<String>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockBackend {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Builder: queue a successful reply
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Builder: queue a failure
    pub fn with_error(self, error: BackendError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, reply: BackendResult<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Snapshot of the calls made so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn record(&self, call: MockCall) -> BackendResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or(Err(BackendError::EmptyResponse))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> BackendResult<String> {
        self.record(MockCall::Generate {
            prompt: prompt.to_string(),
        })
    }

    async fn chat(
        &self,
        history: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> BackendResult<String> {
        self.record(MockCall::Chat {
            history: history.to_vec(),
            system_prompt: system_prompt.map(str::to_string),
        })
    }
}
