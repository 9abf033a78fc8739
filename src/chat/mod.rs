// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat session management
//!
//! The interactive session loop plus its input and presentation seams.

pub mod input;
pub mod session;
pub mod view;

pub use input::{LineSource, ScriptedLineSource, StdinLineSource};
pub use session::{ask, ChatSession, SessionInput, SessionState, INPUT_PROMPT, SLASH_COMMANDS};
pub use view::{AiMessageOptions, ChatView, RecordingView, ViewEvent};
