// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! MiniCoder - a terminal chat client for Gemini models
//!
//! Entry point for the `mini` binary.

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use minicoder::cli::{self, Cli};
use minicoder::commands;
use minicoder::config::Settings;

const LOG_TARGETS: &[&str] = &[
    "minicoder.cli",
    "minicoder.dispatch",
    "minicoder.chat",
    "minicoder.gemini",
    "minicoder.config",
];

fn init_tracing(verbose: bool) {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    if verbose {
        for target in LOG_TARGETS {
            if let Ok(parsed) = format!("{}=debug", target).parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn report_error(err: &minicoder::MiniError) {
    let mut stderr = io::stderr();
    let _ = stderr.execute(SetForegroundColor(Color::Red));
    let _ = write!(stderr, "Error: ");
    let _ = stderr.execute(ResetColor);
    let _ = writeln!(stderr, "{}", err);
}

#[tokio::main]
async fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    init_tracing(cli::wants_verbose(&argv));

    let settings = Arc::new(Settings::load());

    let mut cli = Cli::new("mini");
    commands::register_builtin(cli.dispatcher_mut(), settings, commands::gemini_backend());

    if let Err(e) = cli.run(&argv).await {
        report_error(&e);
        std::process::exit(1);
    }
}
