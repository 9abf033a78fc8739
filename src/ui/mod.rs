// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Terminal presentation: string formatters, markdown rendering and the
//! stdout-backed chat view.

pub mod format;
pub mod markdown;
pub mod terminal;

pub use markdown::render_markdown;
pub use terminal::{spinner, TerminalView};
