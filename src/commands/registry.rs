// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command trait and name/alias registry
//!
//! Registration is last-write-wins: binding a name or alias that is already
//! taken replaces the previous command at that key. This is intentional and
//! covered by tests, not an error condition.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::cli::ParsedArguments;
use crate::error::Result;

/// A named, optionally aliased unit of behavior
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name (e.g., "chat")
    fn name(&self) -> &str;

    /// Secondary lookup key (e.g., "c")
    fn alias(&self) -> Option<&str> {
        None
    }

    /// One-line summary for help output
    fn description(&self) -> &str;

    /// Run the command
    async fn execute(&self, args: &ParsedArguments) -> Result<()>;
}

/// Maps names and aliases to commands
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a command under its name and, if present, its alias.
    ///
    /// Each binding independently overwrites whatever was at that key.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_string();
        let alias = command.alias().map(str::to_string);

        self.bind(name, command.clone());
        if let Some(alias) = alias {
            self.bind(alias, command);
        }
    }

    fn bind(&mut self, key: String, command: Arc<dyn Command>) {
        if let Some(previous) = self.commands.insert(key.clone(), command) {
            tracing::debug!(
                target: "minicoder.dispatch",
                key = %key,
                replaced = previous.name(),
                "command binding overwritten"
            );
        }
    }

    /// Look up a command by name or alias
    pub fn get(&self, key: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(key).cloned()
    }

    /// Whether a key is bound
    pub fn contains(&self, key: &str) -> bool {
        self.commands.contains_key(key)
    }

    /// Number of bound keys (names plus aliases)
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every distinct registered command once, sorted by name.
    ///
    /// A command reachable through both its name and its alias appears once.
    pub fn all_commands(&self) -> Vec<Arc<dyn Command>> {
        let mut unique: Vec<Arc<dyn Command>> = Vec::new();
        for command in self.commands.values() {
            if !unique.iter().any(|seen| same_command(seen, command)) {
                unique.push(command.clone());
            }
        }
        unique.sort_by(|a, b| a.name().cmp(b.name()));
        unique
    }
}

/// Identity comparison on the data pointer only; vtable pointers for the
/// same object may differ across codegen units.
fn same_command(a: &Arc<dyn Command>, b: &Arc<dyn Command>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
