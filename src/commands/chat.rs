// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `chat` and `ask` commands

use std::sync::Arc;

use async_trait::async_trait;

use crate::chat::{self, ChatSession, ChatView, LineSource, StdinLineSource};
use crate::cli::{AskArgs, ChatArgs, ParsedArguments};
use crate::config::Settings;
use crate::error::Result;
use crate::ui::TerminalView;

use super::registry::Command;
use super::BackendFactory;

/// Creates the input source and view for a new chat session
pub type SessionIo = Arc<dyn Fn() -> (Box<dyn LineSource>, Box<dyn ChatView>) + Send + Sync>;

fn terminal_io() -> SessionIo {
    Arc::new(|| {
        (
            Box::new(StdinLineSource::new()) as Box<dyn LineSource>,
            Box::new(TerminalView::new()) as Box<dyn ChatView>,
        )
    })
}

/// Interactive chat
pub struct ChatCommand {
    settings: Arc<Settings>,
    backends: BackendFactory,
    io: SessionIo,
}

impl ChatCommand {
    pub fn new(settings: Arc<Settings>, backends: BackendFactory) -> Self {
        Self {
            settings,
            backends,
            io: terminal_io(),
        }
    }

    /// Replace the terminal with another input source and view
    pub fn with_io(mut self, io: SessionIo) -> Self {
        self.io = io;
        self
    }
}

#[async_trait]
impl Command for ChatCommand {
    fn name(&self) -> &str {
        "chat"
    }

    fn alias(&self) -> Option<&str> {
        Some("c")
    }

    fn description(&self) -> &str {
        "Interactive chat mode"
    }

    async fn execute(&self, args: &ParsedArguments) -> Result<()> {
        let args = ChatArgs::from_parsed(args)?;
        let backend = (self.backends)(&self.settings, args.model.as_deref())?;
        let system_prompt = self.settings.system_prompt()?;
        let model = backend.model().to_string();

        let (input, view) = (self.io)();
        let mut session = ChatSession::new(backend, input, view)
            .with_model(Some(model))
            .with_system_prompt(system_prompt);
        session.run().await;
        Ok(())
    }
}

/// Single question, single answer
pub struct AskCommand {
    settings: Arc<Settings>,
    backends: BackendFactory,
    view: Arc<dyn ChatView>,
}

impl AskCommand {
    pub fn new(settings: Arc<Settings>, backends: BackendFactory) -> Self {
        Self {
            settings,
            backends,
            view: Arc::new(TerminalView::new()),
        }
    }

    pub fn with_view(mut self, view: Arc<dyn ChatView>) -> Self {
        self.view = view;
        self
    }
}

#[async_trait]
impl Command for AskCommand {
    fn name(&self) -> &str {
        "ask"
    }

    fn alias(&self) -> Option<&str> {
        Some("a")
    }

    fn description(&self) -> &str {
        "Ask a single question"
    }

    async fn execute(&self, args: &ParsedArguments) -> Result<()> {
        let args = AskArgs::from_parsed(args)?;
        let backend = (self.backends)(&self.settings, args.model.as_deref())?;
        chat::ask(
            backend.as_ref(),
            self.view.as_ref(),
            &args.prompt,
            Some(backend.model()),
        )
        .await?;
        Ok(())
    }
}
