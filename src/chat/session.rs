// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Interactive chat session
//!
//! A turn-based loop: read a line, handle slash commands locally, otherwise
//! append the message to history and ask the backend for a reply. A failed
//! turn is rolled back so the history never holds a user message without
//! its reply.

use std::sync::Arc;

use crate::chat::input::LineSource;
use crate::chat::view::{AiMessageOptions, ChatView};
use crate::error::{BackendError, MiniError, Result};
use crate::llm::{ChatBackend, ChatMessage};

/// Slash commands understood by the session, with their help text
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/exit", "Exit the conversation"),
    ("/quit", "Exit the conversation"),
    ("/clear", "Clear the conversation history"),
    ("/help", "Show this help"),
    ("/history", "Show the conversation history"),
];

/// Prompt shown before each input line
pub const INPUT_PROMPT: &str = "You ›";

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// A backend call for the current turn is pending
    AwaitingReply,
    Terminated,
}

/// One classified input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Exit,
    Clear,
    Help,
    History,
    Empty,
    Message(String),
}

impl SessionInput {
    /// Classify a raw line. Slash commands match exactly after trimming.
    pub fn classify(line: &str) -> Self {
        match line.trim() {
            "/exit" | "/quit" => SessionInput::Exit,
            "/clear" => SessionInput::Clear,
            "/help" => SessionInput::Help,
            "/history" => SessionInput::History,
            "" => SessionInput::Empty,
            message => SessionInput::Message(message.to_string()),
        }
    }
}

/// State of one interactive conversation
pub struct ChatSession {
    history: Vec<ChatMessage>,
    model: Option<String>,
    system_prompt: Option<String>,
    show_thinking: bool,
    state: SessionState,
    backend: Arc<dyn ChatBackend>,
    input: Box<dyn LineSource>,
    view: Box<dyn ChatView>,
}

impl ChatSession {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        input: Box<dyn LineSource>,
        view: Box<dyn ChatView>,
    ) -> Self {
        Self {
            history: Vec::new(),
            model: None,
            system_prompt: None,
            show_thinking: true,
            state: SessionState::Active,
            backend,
            input,
            view,
        }
    }

    /// Model name shown in the welcome panel and reply badges
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// System instruction sent with every turn
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    /// Toggle the "thinking" indicator around backend calls
    pub fn with_thinking(mut self, show_thinking: bool) -> Self {
        self.show_thinking = show_thinking;
        self
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Run until the operator exits or input ends.
    pub async fn run(&mut self) {
        self.view.welcome(self.model.as_deref());
        tracing::debug!(target: "minicoder.chat", model = ?self.model, "chat session started");

        while self.state != SessionState::Terminated {
            let line = match self.input.read_line(INPUT_PROMPT).await {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(target: "minicoder.chat", error = %e, "input failed, ending session");
                    None
                }
            };
            self.handle_line(line).await;
        }

        tracing::debug!(
            target: "minicoder.chat",
            history_len = self.history.len(),
            "chat session ended"
        );
    }

    /// Process one input event. `None` is end of stream.
    pub async fn handle_line(&mut self, line: Option<String>) -> SessionState {
        if self.state == SessionState::Terminated {
            return self.state;
        }

        let Some(line) = line else {
            self.terminate();
            return self.state;
        };

        match SessionInput::classify(&line) {
            SessionInput::Exit => self.terminate(),
            SessionInput::Clear => {
                self.history.clear();
                self.view.cleared();
            }
            SessionInput::Help => self.view.help(),
            SessionInput::History => self.view.history(&self.history),
            SessionInput::Empty => {}
            SessionInput::Message(content) => self.turn(content).await,
        }

        self.state
    }

    fn terminate(&mut self) {
        self.view.goodbye();
        self.state = SessionState::Terminated;
    }

    async fn turn(&mut self, content: String) {
        let rollback_len = self.history.len();

        self.view.user_message(&content);
        self.history.push(ChatMessage::user(content));
        self.state = SessionState::AwaitingReply;

        tracing::debug!(
            target: "minicoder.chat",
            history_len = self.history.len(),
            "turn started"
        );

        if self.show_thinking {
            self.view.start_thinking();
        }

        let reply = {
            let call = self
                .backend
                .chat(&self.history, self.system_prompt.as_deref());
            tokio::select! {
                biased;
                reply = call => reply,
                _ = self.input.interrupted() => Err(BackendError::Interrupted),
            }
        };

        if self.show_thinking {
            self.view.stop_thinking();
        }

        match reply {
            Ok(text) => {
                self.view.ai_message(
                    &text,
                    AiMessageOptions {
                        model_name: self.model.as_deref(),
                    },
                );
                self.history.push(ChatMessage::model(text));
                tracing::debug!(
                    target: "minicoder.chat",
                    history_len = self.history.len(),
                    "turn finished"
                );
            }
            Err(e) => {
                self.view.error(&e.to_string());
                self.history.truncate(rollback_len);
                tracing::warn!(
                    target: "minicoder.chat",
                    error = %e,
                    history_len = self.history.len(),
                    "turn failed, rolled back"
                );
            }
        }

        self.state = SessionState::Active;
    }
}

/// Single-shot question: one `generate` call, no history, no indicator.
///
/// Backend failures come back wrapped in `MiniError::Generation`.
pub async fn ask(
    backend: &dyn ChatBackend,
    view: &dyn ChatView,
    prompt: &str,
    model_name: Option<&str>,
) -> Result<String> {
    tracing::debug!(target: "minicoder.chat", model = backend.model(), "single-shot ask");
    let reply = backend
        .generate(prompt)
        .await
        .map_err(MiniError::Generation)?;
    view.ai_message(&reply, AiMessageOptions { model_name });
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::input::ScriptedLineSource;
    use crate::chat::view::{RecordingView, ViewEvent};
    use crate::llm::mock::{MockBackend, MockCall};

    fn session(backend: Arc<MockBackend>) -> (ChatSession, RecordingView) {
        let view = RecordingView::new();
        let session = ChatSession::new(
            backend,
            Box::new(ScriptedLineSource::default()),
            Box::new(view.clone()),
        );
        (session, view)
    }

    #[test]
    fn test_classify_slash_commands() {
        assert_eq!(SessionInput::classify("/exit"), SessionInput::Exit);
        assert_eq!(SessionInput::classify("  /quit  "), SessionInput::Exit);
        assert_eq!(SessionInput::classify("/clear"), SessionInput::Clear);
        assert_eq!(SessionInput::classify("/help"), SessionInput::Help);
        assert_eq!(SessionInput::classify("/history"), SessionInput::History);
    }

    #[test]
    fn test_classify_empty_and_messages() {
        assert_eq!(SessionInput::classify(""), SessionInput::Empty);
        assert_eq!(SessionInput::classify(" \t "), SessionInput::Empty);
        assert_eq!(
            SessionInput::classify("  hello  "),
            SessionInput::Message("hello".to_string())
        );
    }

    #[test]
    fn test_classify_is_exact() {
        assert_eq!(
            SessionInput::classify("/EXIT"),
            SessionInput::Message("/EXIT".to_string())
        );
        assert_eq!(
            SessionInput::classify("/exit now"),
            SessionInput::Message("/exit now".to_string())
        );
        assert_eq!(
            SessionInput::classify("/unknown"),
            SessionInput::Message("/unknown".to_string())
        );
    }

    #[tokio::test]
    async fn test_successful_turn_appends_both_messages() {
        let backend = Arc::new(MockBackend::default().with_reply("hi there"));
        let (mut session, view) = session(backend.clone());

        let state = session.handle_line(Some("hello".to_string())).await;

        assert_eq!(state, SessionState::Active);
        assert_eq!(
            session.history(),
            &[ChatMessage::user("hello"), ChatMessage::model("hi there")]
        );
        assert_eq!(
            view.events(),
            vec![
                ViewEvent::UserMessage("hello".to_string()),
                ViewEvent::ThinkingStarted,
                ViewEvent::ThinkingStopped,
                ViewEvent::AiMessage {
                    content: "hi there".to_string(),
                    model_name: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_turn_rolls_back() {
        let backend = Arc::new(MockBackend::default().with_error(BackendError::Status {
            status: 500,
            body: "oops".to_string(),
        }));
        let (mut session, view) = session(backend);

        let state = session.handle_line(Some("hello".to_string())).await;

        assert_eq!(state, SessionState::Active);
        assert!(session.history().is_empty());
        assert_eq!(view.error_count(), 1);
    }

    #[tokio::test]
    async fn test_message_is_trimmed() {
        let backend = Arc::new(MockBackend::default().with_reply("ok"));
        let (mut session, _view) = session(backend.clone());

        session.handle_line(Some("  spaced  ".to_string())).await;

        assert_eq!(session.history()[0], ChatMessage::user("spaced"));
    }

    #[tokio::test]
    async fn test_system_prompt_is_threaded() {
        let backend = Arc::new(MockBackend::default().with_reply("ok"));
        let (session, _view) = session(backend.clone());
        let mut session = session.with_system_prompt(Some("be terse".to_string()));

        session.handle_line(Some("q".to_string())).await;

        assert_eq!(
            backend.calls(),
            vec![MockCall::Chat {
                history: vec![ChatMessage::user("q")],
                system_prompt: Some("be terse".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_thinking_can_be_disabled() {
        let backend = Arc::new(MockBackend::default().with_reply("ok"));
        let (session, view) = session(backend);
        let mut session = session.with_thinking(false);

        session.handle_line(Some("q".to_string())).await;

        assert!(!view.events().contains(&ViewEvent::ThinkingStarted));
    }

    #[tokio::test]
    async fn test_model_badge() {
        let backend = Arc::new(MockBackend::default().with_reply("ok"));
        let (session, view) = session(backend);
        let mut session = session.with_model(Some("gemini-pro".to_string()));

        session.handle_line(Some("q".to_string())).await;

        assert!(view.events().contains(&ViewEvent::AiMessage {
            content: "ok".to_string(),
            model_name: Some("gemini-pro".to_string()),
        }));
    }

    #[tokio::test]
    async fn test_end_of_stream_terminates() {
        let backend = Arc::new(MockBackend::default());
        let (mut session, view) = session(backend.clone());

        assert_eq!(session.handle_line(None).await, SessionState::Terminated);
        assert_eq!(view.events(), vec![ViewEvent::Goodbye]);

        // Further input is ignored.
        assert_eq!(
            session.handle_line(Some("hello".to_string())).await,
            SessionState::Terminated
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_line_is_silent() {
        let backend = Arc::new(MockBackend::default());
        let (mut session, view) = session(backend.clone());

        assert_eq!(
            session.handle_line(Some("   ".to_string())).await,
            SessionState::Active
        );
        assert!(view.events().is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_renders_without_thinking() {
        let backend = MockBackend::default().with_reply("42");
        let view = RecordingView::new();

        let reply = ask(&backend, &view, "meaning?", Some("m")).await.unwrap();

        assert_eq!(reply, "42");
        assert_eq!(
            view.events(),
            vec![ViewEvent::AiMessage {
                content: "42".to_string(),
                model_name: Some("m".to_string()),
            }]
        );
        assert_eq!(
            backend.calls(),
            vec![MockCall::Generate {
                prompt: "meaning?".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_ask_wraps_failure() {
        let backend = MockBackend::default().with_error(BackendError::Blocked {
            reason: "SAFETY".to_string(),
        });
        let view = RecordingView::new();

        let err = ask(&backend, &view, "q", None).await.unwrap_err();

        assert!(matches!(err, MiniError::Generation(BackendError::Blocked { .. })));
        assert!(err.to_string().contains("SAFETY"));
        assert!(view.events().is_empty());
    }
}
