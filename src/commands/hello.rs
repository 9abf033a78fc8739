// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use async_trait::async_trait;

use crate::cli::{HelloArgs, ParsedArguments};
use crate::error::Result;

use super::registry::Command;

/// Prints a greeting
pub struct HelloCommand;

impl HelloCommand {
    pub fn greeting(name: Option<&str>) -> String {
        format!("Hello, {}!", name.unwrap_or("World"))
    }
}

#[async_trait]
impl Command for HelloCommand {
    fn name(&self) -> &str {
        "hello"
    }

    fn alias(&self) -> Option<&str> {
        Some("hi")
    }

    fn description(&self) -> &str {
        "Say hello"
    }

    async fn execute(&self, args: &ParsedArguments) -> Result<()> {
        let args = HelloArgs::from_parsed(args)?;
        println!("{}", Self::greeting(args.name.as_deref()));
        Ok(())
    }
}
