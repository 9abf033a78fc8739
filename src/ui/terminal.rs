// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat view that draws to the terminal

use std::sync::Mutex;
use std::time::Duration;

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::chat::{AiMessageOptions, ChatView};
use crate::llm::ChatMessage;
use crate::ui::format;
use crate::ui::markdown::render_markdown;

const THINKING_FRAMES: &[&str] = &["   ", "•  ", "•• ", "•••", "•• ", "•  ", "   "];

/// Create a running spinner with the given message
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        pb.set_style(style.tick_strings(THINKING_FRAMES));
    }
    pb.set_message(message.dim().to_string());
    pb.enable_steady_tick(Duration::from_millis(300));
    pb
}

/// `ChatView` writing to stdout
#[derive(Default)]
pub struct TerminalView {
    thinking: Mutex<Option<ProgressBar>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatView for TerminalView {
    fn welcome(&self, model_name: Option<&str>) {
        println!("{}", format::format_welcome(model_name));
    }

    fn user_message(&self, content: &str) {
        println!("{}", format::format_user_message(content));
    }

    fn start_thinking(&self) {
        if let Ok(mut slot) = self.thinking.lock() {
            if let Some(previous) = slot.replace(spinner("Thinking")) {
                previous.finish_and_clear();
            }
        }
    }

    fn stop_thinking(&self) {
        if let Ok(mut slot) = self.thinking.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn ai_message(&self, content: &str, options: AiMessageOptions<'_>) {
        let rendered = render_markdown(content);
        println!("{}", format::format_ai_message(&rendered, options.model_name));
    }

    fn error(&self, message: &str) {
        println!("{}", format::format_error(message));
    }

    fn cleared(&self) {
        println!("{}", format::format_cleared());
    }

    fn help(&self) {
        println!("{}", format::format_help_panel());
    }

    fn history(&self, messages: &[ChatMessage]) {
        println!("{}", format::format_history(messages));
    }

    fn goodbye(&self) {
        println!("{}", format::format_goodbye());
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        if let Ok(slot) = self.thinking.get_mut() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}
