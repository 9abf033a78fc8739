// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI module for MiniCoder
//!
//! Handles command-line argument parsing and command dispatch.

use std::sync::Arc;

use crate::commands::{Command, Dispatcher};
use crate::error::Result;

pub mod args;

pub use args::*;

/// Process-level entry: owns the binary name and the command table
pub struct Cli {
    bin_name: String,
    dispatcher: Dispatcher,
}

impl Cli {
    pub fn new(bin_name: impl Into<String>) -> Self {
        Self {
            bin_name: bin_name.into(),
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.dispatcher.register(command);
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Run with the arguments that follow the binary name.
    pub async fn run<S: AsRef<str>>(&self, argv: &[S]) -> Result<()> {
        let (_, argv) = split_global_flags(argv);

        match resolve_invocation(argv) {
            Invocation::Help => {
                tracing::debug!(target: "minicoder.cli", "printing help");
                println!("{}", self.help_text());
                Ok(())
            }
            Invocation::Run { command, args } => {
                tracing::debug!(target: "minicoder.cli", command = %command, "resolved command");
                self.dispatcher.dispatch(&command, &args).await
            }
        }
    }

    /// Usage text listing every distinct command once
    pub fn help_text(&self) -> String {
        let commands: Vec<String> = self
            .dispatcher
            .commands()
            .iter()
            .map(|c| format!("  {:<12} {}", c.name(), c.description()))
            .collect();

        format!(
            "\nUsage: {} <command> [options]\n\nCommands:\n{}\n\nOptions:\n  --help, -h     Show this help message\n  --verbose      Enable verbose output\n",
            self.bin_name,
            commands.join("\n")
        )
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new("mini")
    }
}
