// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Display formatting for the chat interface
//!
//! Functions return formatted strings rather than writing to stdout, so the
//! terminal view stays thin and the layout is testable.

use std::borrow::Cow;
use std::sync::OnceLock;

use crossterm::style::Stylize;
use regex::Regex;

use crate::chat::SLASH_COMMANDS;
use crate::llm::{ChatMessage, Role};

/// Characters of message content shown per `/history` entry
pub const PREVIEW_CHARS: usize = 50;

const RULE: &str = "───────────────────────";

pub const SYMBOL_SUCCESS: &str = "✔";
pub const SYMBOL_ERROR: &str = "✖";
pub const SYMBOL_INFO: &str = "ℹ";
pub const SYMBOL_STAR: &str = "★";

/// Remove ANSI escape sequences
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    static ANSI_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ANSI_REGEX
        .get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ANSI pattern is valid"));
    regex.replace_all(s, "")
}

/// Display width of a string, ignoring escape sequences
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// First `PREVIEW_CHARS` characters of `content`, with `...` appended when cut
pub fn truncate_preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        content.to_string()
    } else {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

/// Draw a rounded box around `content` with an optional centered title.
pub fn box_content(content: &str, title: Option<&str>) -> String {
    const PAD: usize = 3;

    let lines: Vec<&str> = content.lines().collect();
    let content_width = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
    let title_width = title.map(|t| visible_width(t) + 2).unwrap_or(0);
    let inner = (content_width + PAD * 2).max(title_width + 2);

    let top = match title {
        Some(title) => {
            let label = format!(" {} ", title);
            let remaining = inner - visible_width(&label);
            let left = remaining / 2;
            format!(
                "╭{}{}{}╮",
                "─".repeat(left),
                label,
                "─".repeat(remaining - left)
            )
        }
        None => format!("╭{}╮", "─".repeat(inner)),
    };

    let blank = format!("│{}│", " ".repeat(inner));
    let mut out = vec![top, blank.clone()];
    for line in lines {
        let fill = inner - PAD - visible_width(line);
        out.push(format!("│{}{}{}│", " ".repeat(PAD), line, " ".repeat(fill)));
    }
    out.push(blank);
    out.push(format!("╰{}╯", "─".repeat(inner)));
    out.join("\n")
}

/// User message bubble; multi-line input is indented under the header
pub fn format_user_message(content: &str) -> String {
    let body = if content.contains('\n') {
        let indented: Vec<String> = content.lines().map(|l| format!("  {}", l)).collect();
        format!("\n{}\n", indented.join("\n"))
    } else {
        format!(" {}", content)
    };

    format!(
        "\n{}{}\n{}{}\n{}{}\n",
        "╭─ You".cyan(),
        format!(" {}", RULE).dim(),
        "│".cyan(),
        body,
        "╰".cyan(),
        RULE.dim()
    )
}

/// AI message bubble around already-rendered content
pub fn format_ai_message(rendered: &str, model_name: Option<&str>) -> String {
    let badge = model_name
        .map(|name| format!("{} ", format!(" {} ", name).white().on_cyan()))
        .unwrap_or_default();

    let mut out = format!(
        "\n{} {}{}{}\n",
        "╭─".green(),
        badge,
        "AI".green(),
        format!(" {}", RULE).dim()
    );
    for line in rendered.lines() {
        out.push_str(&format!("{} {}\n", "│".green(), line));
    }
    out.push_str(&format!("{}{}\n", "╰".green(), RULE.dim()));
    out
}

/// Panel listing the slash commands
pub fn format_help_panel() -> String {
    let mut lines = vec!["━━ Commands ━━".cyan().bold().to_string(), String::new()];
    for (command, description) in SLASH_COMMANDS {
        lines.push(format!("  {}  {}", command.cyan(), description.dim()));
    }
    lines.push(String::new());
    lines.push("Shortcuts:".dim().to_string());
    lines.push("  Ctrl+C   cancel input".dim().to_string());
    box_content(&lines.join("\n"), Some("Help"))
}

/// One line per message: 1-based ordinal, role, truncated preview
pub fn history_lines(messages: &[ChatMessage]) -> Vec<String> {
    messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let role = match message.role {
                Role::User => "You".cyan(),
                Role::Model => "AI".green(),
            };
            format!(
                "{} {}: {}",
                format!("{}.", i + 1).dim(),
                role,
                truncate_preview(&message.content)
            )
        })
        .collect()
}

pub fn format_history(messages: &[ChatMessage]) -> String {
    let body = if messages.is_empty() {
        "no messages yet".dim().to_string()
    } else {
        history_lines(messages).join("\n")
    };
    format!("\n{}\n\n{}\n", "━━ History ━━".cyan().bold(), body)
}

pub fn format_welcome(model_name: Option<&str>) -> String {
    let mut lines = vec![
        format!("{} Welcome to MiniCoder Chat", SYMBOL_STAR.cyan()),
        String::new(),
        "Type a question to start talking to the AI".dim().to_string(),
        String::new(),
        "Commands:".cyan().to_string(),
    ];
    lines.extend(SLASH_COMMANDS.iter().map(|(c, _)| format!("  {}", c)));

    let title = match model_name {
        Some(model) => format!("MiniCoder ({})", model),
        None => "MiniCoder".to_string(),
    };
    format!("\n{}\n", box_content(&lines.join("\n"), Some(&title)))
}

pub fn format_goodbye() -> String {
    let content = format!(
        "{}\nThanks for using MiniCoder\nGoodbye!",
        SYMBOL_STAR.cyan()
    );
    format!("\n{}\n", box_content(&content, Some("Exit")))
}

pub fn format_cleared() -> String {
    format!(
        "\n{} {}\n",
        SYMBOL_SUCCESS.green(),
        "Conversation cleared".bold()
    )
}

pub fn format_error(message: &str) -> String {
    format!("\n{} {}: {}\n", SYMBOL_ERROR.red(), "Error".bold(), message)
}

pub fn format_success(message: &str) -> String {
    format!(" {} {}", SYMBOL_SUCCESS.green(), message)
}

pub fn format_failure(message: &str) -> String {
    format!(" {} {}", SYMBOL_ERROR.red(), message)
}

pub fn format_info(message: &str) -> String {
    format!(" {} {}", SYMBOL_INFO.blue(), message)
}

/// `key: value` line used by summaries
pub fn format_key_value(key: &str, value: &str) -> String {
    format!("{}: {}", key.cyan(), value)
}
