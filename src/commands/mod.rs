// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Commands and their dispatch
//!
//! `registry` and `dispatcher` route a command name to a handler; the other
//! modules are the handlers themselves.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::llm::{ChatBackend, GeminiClient};

pub mod chat;
pub mod dispatcher;
pub mod hello;
pub mod init;
pub mod registry;

pub use chat::{AskCommand, ChatCommand};
pub use dispatcher::Dispatcher;
pub use hello::HelloCommand;
pub use init::InitCommand;
pub use registry::{Command, CommandRegistry};

/// Builds a backend from settings and an optional model override
pub type BackendFactory =
    Arc<dyn Fn(&Settings, Option<&str>) -> Result<Arc<dyn ChatBackend>> + Send + Sync>;

/// Factory producing `GeminiClient`s
pub fn gemini_backend() -> BackendFactory {
    Arc::new(
        |settings: &Settings, model: Option<&str>| -> Result<Arc<dyn ChatBackend>> {
            let client = GeminiClient::new(settings, model)?;
            Ok(Arc::new(client))
        },
    )
}

/// Register the built-in commands
pub fn register_builtin(
    dispatcher: &mut Dispatcher,
    settings: Arc<Settings>,
    backends: BackendFactory,
) {
    dispatcher.register(Arc::new(ChatCommand::new(settings.clone(), backends.clone())));
    dispatcher.register(Arc::new(AskCommand::new(settings.clone(), backends.clone())));
    dispatcher.register(Arc::new(InitCommand::new(settings, backends)));
    dispatcher.register(Arc::new(HelloCommand));
}
