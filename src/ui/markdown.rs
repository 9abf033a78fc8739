// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Markdown to ANSI rendering
//!
//! A line-oriented renderer covering what chat replies actually contain:
//! headings, fenced code blocks, bullet and numbered lists, block quotes,
//! and inline bold, italic and code spans.

use std::sync::OnceLock;

use crossterm::style::Stylize;
use regex::{Captures, Regex};

fn inline_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"))
}

fn bold_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").expect("bold pattern is valid"))
}

fn italic_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(^|[^*\w])\*([^*\s][^*]*)\*").expect("italic pattern is valid")
    })
}

fn numbered_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)(\d+)\.\s+(.*)$").expect("list pattern is valid"))
}

/// Render markdown text as ANSI-styled terminal text.
pub fn render_markdown(text: &str) -> String {
    let mut out = Vec::new();
    let mut in_code = false;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if let Some(lang) = trimmed.strip_prefix("```") {
            if in_code {
                in_code = false;
            } else {
                in_code = true;
                let label = if lang.trim().is_empty() {
                    "code"
                } else {
                    lang.trim()
                };
                out.push(format!(" {} ", label).white().on_dark_grey().to_string());
            }
            continue;
        }

        if in_code {
            out.push(line.yellow().to_string());
            continue;
        }

        out.push(render_block_line(line, trimmed));
    }

    out.join("\n")
}

fn render_block_line(line: &str, trimmed: &str) -> String {
    let indent = &line[..line.len() - trimmed.len()];

    if let Some(heading) = heading_text(trimmed) {
        return render_inline(heading).cyan().bold().to_string();
    }

    if let Some(quote) = trimmed.strip_prefix("> ") {
        return format!("{} {}", "│".dim(), render_inline(quote).italic());
    }

    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("+ "))
    {
        return format!("{}{} {}", indent, "•".cyan(), render_inline(item));
    }

    if let Some(caps) = numbered_regex().captures(line) {
        return format!(
            "{}{} {}",
            &caps[1],
            format!("{}.", &caps[2]).cyan(),
            render_inline(&caps[3])
        );
    }

    if trimmed == "---" || trimmed == "***" {
        return "─".repeat(40).dim().to_string();
    }

    render_inline(line)
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        line[hashes..].strip_prefix(' ').map(str::trim)
    } else {
        None
    }
}

/// Apply inline styles. Code spans are styled first and left untouched by
/// the emphasis passes.
pub fn render_inline(text: &str) -> String {
    let mut out = String::new();
    let mut last = 0;

    for caps in inline_code_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&render_emphasis(&text[last..whole.start()]));
        out.push_str(&caps[1].yellow().to_string());
        last = whole.end();
    }
    out.push_str(&render_emphasis(&text[last..]));
    out
}

fn render_emphasis(text: &str) -> String {
    let bolded = bold_regex().replace_all(text, |caps: &Captures| {
        let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        inner.bold().to_string()
    });
    italic_regex()
        .replace_all(&bolded, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].italic())
        })
        .into_owned()
}
