// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command dispatch
//!
//! Resolves a command name through the registry and runs it. Unknown names are
//! reported as errors; nothing is guessed or auto-corrected.

use std::sync::Arc;

use crate::cli::ParsedArguments;
use crate::error::{MiniError, Result};

use super::registry::{Command, CommandRegistry};

/// Routes command names to handlers
#[derive(Default, Clone)]
pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command (last write wins per key)
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.registry.register(command);
    }

    /// Run the command bound to `name`, forwarding its result unchanged.
    pub async fn dispatch(&self, name: &str, args: &ParsedArguments) -> Result<()> {
        let command = self
            .registry
            .get(name)
            .ok_or_else(|| MiniError::UnknownCommand(name.to_string()))?;

        tracing::debug!(
            target: "minicoder.dispatch",
            requested = name,
            command = command.name(),
            positional = args.positional().len(),
            options = args.options().len(),
            "dispatching command"
        );

        command.execute(args).await
    }

    /// Look up a command by name or alias
    pub fn command(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.registry.get(name)
    }

    /// Distinct registered commands, sorted by name
    pub fn commands(&self) -> Vec<Arc<dyn Command>> {
        self.registry.all_commands()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Command for Counting {
        fn name(&self) -> &str {
            "count"
        }

        fn alias(&self) -> Option<&str> {
            Some("n")
        }

        fn description(&self) -> &str {
            "Counts invocations"
        }

        async fn execute(&self, _args: &ParsedArguments) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail {
                return Err(MiniError::Usage("bad input".to_string()));
            }
            Ok(())
        }
    }

    fn dispatcher(fail: bool) -> (Dispatcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Arc::new(Counting {
            calls: calls.clone(),
            fail,
        }));
        (dispatcher, calls)
    }

    #[tokio::test]
    async fn test_dispatch_by_name_and_alias() {
        let (dispatcher, calls) = dispatcher(false);
        dispatcher
            .dispatch("count", &ParsedArguments::default())
            .await
            .unwrap();
        dispatcher
            .dispatch("n", &ParsedArguments::default())
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let (dispatcher, calls) = dispatcher(false);
        let err = dispatcher
            .dispatch("nope", &ParsedArguments::default())
            .await
            .unwrap_err();

        assert!(matches!(err, MiniError::UnknownCommand(ref name) if name == "nope"));
        assert_eq!(err.to_string(), "Unknown command: nope");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_forwards_handler_error() {
        let (dispatcher, calls) = dispatcher(true);
        let err = dispatcher
            .dispatch("count", &ParsedArguments::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MiniError::Usage(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_commands_are_distinct() {
        let (dispatcher, _) = dispatcher(false);
        assert_eq!(dispatcher.registry().len(), 2);
        assert_eq!(dispatcher.commands().len(), 1);
        assert!(dispatcher.command("n").is_some());
    }
}
