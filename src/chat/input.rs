// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Line input for the chat session

use std::collections::VecDeque;
use std::io::Write;

use async_trait::async_trait;
use crossterm::style::Stylize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::error::Result;

/// Source of operator input lines.
#[async_trait]
pub trait LineSource: Send {
    /// Read one line. `Ok(None)` means end of stream, including an interrupt
    /// while waiting.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Resolves when the operator interrupts a pending operation.
    ///
    /// The default never resolves.
    async fn interrupted(&mut self) {
        std::future::pending::<()>().await
    }
}

/// Ctrl+C listener that lives as long as its owner.
///
/// Presses that arrive while nothing is waiting are kept and delivered to
/// the next wait.
struct InterruptListener {
    #[cfg(unix)]
    signal: tokio::signal::unix::Signal,
    #[cfg(windows)]
    signal: tokio::signal::windows::CtrlC,
}

impl InterruptListener {
    #[cfg(unix)]
    fn new() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            signal: signal(SignalKind::interrupt())?,
        })
    }

    #[cfg(windows)]
    fn new() -> std::io::Result<Self> {
        Ok(Self {
            signal: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(&mut self) {
        if self.signal.recv().await.is_none() {
            std::future::pending::<()>().await
        }
    }
}

/// Wait for the next Ctrl+C, installing the listener on first use.
async fn next_interrupt(listener: &mut Option<InterruptListener>) {
    if listener.is_none() {
        match InterruptListener::new() {
            Ok(installed) => *listener = Some(installed),
            Err(e) => {
                tracing::warn!(target: "minicoder.chat", error = %e, "cannot listen for Ctrl+C");
            }
        }
    }

    match listener.as_mut() {
        Some(listener) => listener.recv().await,
        // No signal handler available; never fire.
        None => std::future::pending::<()>().await,
    }
}

/// Read one line into `buf`, decoding invalid UTF-8 lossily.
///
/// Bytes stay in `buf` until a full line arrives, so a cancelled read loses
/// nothing. Returns `None` at end of stream.
pub async fn read_lossy_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }

    let mut end = buf.len();
    if buf[..end].ends_with(b"\n") {
        end -= 1;
    }
    if buf[..end].ends_with(b"\r") {
        end -= 1;
    }
    let line = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.clear();
    Ok(Some(line))
}

/// Reads lines from stdin; Ctrl+C resolves a pending read as end of stream.
pub struct StdinLineSource {
    reader: BufReader<Stdin>,
    buf: Vec<u8>,
    interrupts: Option<InterruptListener>,
}

impl StdinLineSource {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            buf: Vec::new(),
            interrupts: None,
        }
    }
}

impl Default for StdinLineSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for StdinLineSource {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{} ", prompt.cyan().bold());
        std::io::stdout().flush()?;

        tokio::select! {
            line = read_lossy_line(&mut self.reader, &mut self.buf) => Ok(line?),
            _ = next_interrupt(&mut self.interrupts) => {
                println!();
                tracing::debug!(target: "minicoder.chat", "input interrupted");
                Ok(None)
            }
        }
    }

    async fn interrupted(&mut self) {
        next_interrupt(&mut self.interrupts).await
    }
}

/// Replays a fixed list of lines, then reports end of stream.
#[derive(Debug, Default)]
pub struct ScriptedLineSource {
    lines: VecDeque<String>,
    interrupts: usize,
    prompts: Vec<String>,
}

impl ScriptedLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            interrupts: 0,
            prompts: Vec::new(),
        }
    }

    /// Deliver `count` interrupts, one per pending operation
    pub fn with_interrupts(mut self, count: usize) -> Self {
        self.interrupts = count;
        self
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

#[async_trait]
impl LineSource for ScriptedLineSource {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }

    async fn interrupted(&mut self) {
        if self.interrupts > 0 {
            self.interrupts -= 1;
        } else {
            std::future::pending::<()>().await
        }
    }
}
