// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Presentation seam for the chat session

use std::sync::{Arc, Mutex};

use crate::llm::ChatMessage;

/// Rendering options for a model reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiMessageOptions<'a> {
    /// Shown as a badge in the reply header
    pub model_name: Option<&'a str>,
}

/// Everything the session shows the operator goes through this trait.
pub trait ChatView: Send + Sync {
    fn welcome(&self, model_name: Option<&str>);
    fn user_message(&self, content: &str);
    /// Show the "thinking" indicator while a reply is pending
    fn start_thinking(&self);
    fn stop_thinking(&self);
    fn ai_message(&self, content: &str, options: AiMessageOptions<'_>);
    fn error(&self, message: &str);
    fn cleared(&self);
    fn help(&self);
    fn history(&self, messages: &[ChatMessage]);
    fn goodbye(&self);
}

/// What a `RecordingView` saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Welcome(Option<String>),
    UserMessage(String),
    ThinkingStarted,
    ThinkingStopped,
    AiMessage {
        content: String,
        model_name: Option<String>,
    },
    Error(String),
    Cleared,
    Help,
    History(Vec<ChatMessage>),
    Goodbye,
}

/// View that records events instead of drawing them.
///
/// Clones share the same event log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of rendered errors
    pub fn error_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ViewEvent::Error(_)))
            .count()
    }

    fn push(&self, event: ViewEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl ChatView for RecordingView {
    fn welcome(&self, model_name: Option<&str>) {
        self.push(ViewEvent::Welcome(model_name.map(str::to_string)));
    }

    fn user_message(&self, content: &str) {
        self.push(ViewEvent::UserMessage(content.to_string()));
    }

    fn start_thinking(&self) {
        self.push(ViewEvent::ThinkingStarted);
    }

    fn stop_thinking(&self) {
        self.push(ViewEvent::ThinkingStopped);
    }

    fn ai_message(&self, content: &str, options: AiMessageOptions<'_>) {
        self.push(ViewEvent::AiMessage {
            content: content.to_string(),
            model_name: options.model_name.map(str::to_string),
        });
    }

    fn error(&self, message: &str) {
        self.push(ViewEvent::Error(message.to_string()));
    }

    fn cleared(&self) {
        self.push(ViewEvent::Cleared);
    }

    fn help(&self) {
        self.push(ViewEvent::Help);
    }

    fn history(&self, messages: &[ChatMessage]) {
        self.push(ViewEvent::History(messages.to_vec()));
    }

    fn goodbye(&self) {
        self.push(ViewEvent::Goodbye);
    }
}
