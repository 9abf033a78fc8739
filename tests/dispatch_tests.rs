// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use minicoder::cli::ParsedArguments;
use minicoder::commands::{Command, CommandRegistry, Dispatcher};
use minicoder::{MiniError, Result};

struct Probe {
    name: &'static str,
    alias: Option<&'static str>,
    runs: AtomicUsize,
    fail: bool,
}

impl Probe {
    fn new(name: &'static str, alias: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            name,
            alias,
            runs: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            alias: None,
            runs: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Command for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn alias(&self) -> Option<&str> {
        self.alias
    }

    fn description(&self) -> &str {
        "probe"
    }

    async fn execute(&self, _args: &ParsedArguments) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail {
            Err(MiniError::Usage("probe failed".to_string()))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn test_dispatch_by_name_and_alias() {
    let probe = Probe::new("chat", Some("c"));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(probe.clone());

    dispatcher.dispatch("chat", &ParsedArguments::default()).await.unwrap();
    dispatcher.dispatch("c", &ParsedArguments::default()).await.unwrap();

    assert_eq!(probe.runs(), 2);
}

#[tokio::test]
async fn test_unknown_command_runs_nothing() {
    let probe = Probe::new("chat", Some("c"));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(probe.clone());

    let err = dispatcher
        .dispatch("nope", &ParsedArguments::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MiniError::UnknownCommand(ref name) if name == "nope"));
    assert_eq!(probe.runs(), 0);
}

#[tokio::test]
async fn test_handler_failure_is_forwarded() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Probe::failing("bad"));

    let err = dispatcher
        .dispatch("bad", &ParsedArguments::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "probe failed");
}

#[tokio::test]
async fn test_same_name_last_registration_wins() {
    let first = Probe::new("dup", None);
    let second = Probe::new("dup", None);
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(first.clone());
    dispatcher.register(second.clone());

    dispatcher.dispatch("dup", &ParsedArguments::default()).await.unwrap();

    assert_eq!(first.runs(), 0);
    assert_eq!(second.runs(), 1);
    assert_eq!(dispatcher.commands().len(), 1);
}

#[tokio::test]
async fn test_alias_can_shadow_another_name() {
    let ask = Probe::new("ask", Some("a"));
    let shadow = Probe::new("shadow", Some("ask"));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(ask.clone());
    dispatcher.register(shadow.clone());

    dispatcher.dispatch("ask", &ParsedArguments::default()).await.unwrap();
    dispatcher.dispatch("a", &ParsedArguments::default()).await.unwrap();

    assert_eq!(shadow.runs(), 1);
    assert_eq!(ask.runs(), 1);
}

#[test]
fn test_all_commands_deduplicates() {
    let mut registry = CommandRegistry::new();
    registry.register(Probe::new("chat", Some("c")));
    registry.register(Probe::new("ask", Some("a")));
    registry.register(Probe::new("hello", None));

    assert_eq!(registry.len(), 5);
    let names: Vec<String> = registry
        .all_commands()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names, vec!["ask", "chat", "hello"]);
}
