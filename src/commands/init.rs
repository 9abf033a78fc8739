// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `init` command: write API key, model and proxy to a config file
//!
//! Values come from flags first, then from existing settings, and are
//! prompted for only when neither provides one.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use crossterm::style::Stylize;
use tokio::sync::Mutex;

use crate::chat::{LineSource, StdinLineSource};
use crate::cli::{InitArgs, ParsedArguments};
use crate::config::{Settings, PLACEHOLDER_API_KEY};
use crate::error::{BackendError, Result};
use crate::ui::format::{
    box_content, format_failure, format_info, format_key_value, format_success,
};
use crate::ui::spinner;

use super::registry::Command;
use super::BackendFactory;

/// Models offered when none is configured
pub const MODEL_CHOICES: &[(&str, &str)] = &[
    ("gemini-2.5-flash", "fast responses, recommended for daily use"),
    ("gemini-2.5-pro", "high quality output for complex tasks"),
    ("gemini-pro", "balanced performance and cost"),
];

/// Model stored when no choice is made
pub const FALLBACK_MODEL: &str = "gemini-1.5-flash";

/// Result of the post-save connectivity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCheck {
    /// No usable API key, nothing attempted
    Skipped,
    Passed,
    Failed(String),
}

/// Outcome of one `init` run
#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub settings: Settings,
    pub saved_to: PathBuf,
    pub connection: ConnectionCheck,
}

pub struct InitCommand {
    settings: Arc<Settings>,
    backends: BackendFactory,
    input: Mutex<Box<dyn LineSource>>,
}

impl InitCommand {
    pub fn new(settings: Arc<Settings>, backends: BackendFactory) -> Self {
        Self {
            settings,
            backends,
            input: Mutex::new(Box::new(StdinLineSource::new())),
        }
    }

    /// Read prompted answers from another source
    pub fn with_input(mut self, input: Box<dyn LineSource>) -> Self {
        self.input = Mutex::new(input);
        self
    }

    /// Run the configuration flow and report what was done.
    pub async fn run(&self, args: &InitArgs) -> Result<InitOutcome> {
        let mut settings = (*self.settings).clone();
        let mut input = self.input.lock().await;

        print_header("MiniCoder setup", "Configure your API key and preferences");

        // 1. API key
        if let Some(ref key) = args.api_key {
            settings.set_api_key(key.clone());
            println!("{}", format_success("API key set"));
        } else if settings.has_api_key() {
            println!("{}", format_success("Existing API key detected"));
        } else {
            print_section("API key");
            println!(
                "{}",
                format_info("Get a key at https://aistudio.google.com/app/apikey")
            );
            println!(
                "{}",
                format_info("or set it via: export MINICODER_API_KEY=\"your-key\"")
            );
            match answer(&mut **input, "Gemini API key:").await? {
                Some(key) => {
                    settings.set_api_key(key);
                    println!("{}", format_success("API key configured"));
                }
                None => {
                    settings.set_api_key(PLACEHOLDER_API_KEY);
                    println!(
                        "{}",
                        format_info("Skipped; set MINICODER_API_KEY later")
                    );
                }
            }
        }

        // 2. Model
        print_section("Model");
        if let Some(ref model) = args.model {
            settings.set_model(model.clone());
            println!("{}", format_success(&format!("Model set to {}", model)));
        } else if let Some(model) = settings.model() {
            println!("{}", format_key_value("Current model", model));
        } else {
            for (i, (model, hint)) in MODEL_CHOICES.iter().enumerate() {
                println!("  {} {}  {}", format!("{}.", i + 1).cyan(), model, hint.dim());
            }
            let prompt = format!("Choose a model [1-{}]:", MODEL_CHOICES.len());
            match answer(&mut **input, &prompt).await?.and_then(|a| model_choice(&a)) {
                Some(model) => {
                    settings.set_model(model);
                    println!("{}", format_success(&format!("Model set to {}", model)));
                }
                None => {
                    settings.set_model(FALLBACK_MODEL);
                    println!(
                        "{}",
                        format_info(&format!("Using default model {}", FALLBACK_MODEL))
                    );
                }
            }
        }

        // 3. Proxy
        print_section("Proxy");
        if let Some(ref proxy) = args.proxy {
            settings.set_proxy(Some(proxy.clone()));
            println!("{}", format_success(&format!("Proxy set to {}", proxy)));
        } else if let Some(proxy) = settings.proxy() {
            println!("{}", format_key_value("Current proxy", proxy));
        } else {
            let wants_proxy = answer(&mut **input, "Configure a proxy? [y/N]:")
                .await?
                .map(|a| is_yes(&a))
                .unwrap_or(false);
            if wants_proxy {
                if let Some(url) =
                    answer(&mut **input, "Proxy URL (e.g. http://127.0.0.1:7890):").await?
                {
                    println!("{}", format_success(&format!("Proxy set to {}", url)));
                    settings.set_proxy(Some(url));
                }
            } else {
                println!("{}", format_info("Using a direct connection"));
            }
        }
        drop(input);

        // 4. Save
        print_section("Save");
        let saved_to = if args.local {
            settings.save_to_project()?
        } else {
            settings.save_to_user()?
        };
        println!(
            "{}",
            format_success(&format!("Configuration saved to {}", saved_to.display()))
        );
        println!(
            "{}",
            format_info("Saved values take precedence over MINICODER_* variables")
        );
        tracing::debug!(target: "minicoder.config", path = %saved_to.display(), "init saved settings");

        // 5. Summary
        println!("{}", box_content(&summary(&settings), Some("Current configuration")));

        // 6. Connectivity
        let connection = self.check_connection(&settings).await;
        match connection {
            ConnectionCheck::Passed => {
                println!("{}", format_success("API connection test passed"));
                println!("{}", format_info("You are ready to use MiniCoder"));
            }
            ConnectionCheck::Failed(ref reason) => {
                println!("{}", format_failure(&format!("API connection failed: {}", reason)));
                println!("{}", format_info("Check your API key or proxy settings"));
            }
            ConnectionCheck::Skipped => {
                println!(
                    "{}",
                    format_info("Set a valid API key to test the connection")
                );
            }
        }

        println!(
            "{}",
            format_success(&format!("Setup complete! Run {} to start", "mini chat".cyan()))
        );

        Ok(InitOutcome {
            settings,
            saved_to,
            connection,
        })
    }

    async fn check_connection(&self, settings: &Settings) -> ConnectionCheck {
        if !settings.has_api_key() {
            return ConnectionCheck::Skipped;
        }
        print_section("API connection test");

        let pb = spinner("Testing API connection...");
        let result = match (self.backends)(settings, None) {
            Ok(backend) => {
                let mut input = self.input.lock().await;
                tokio::select! {
                    biased;
                    reply = backend.generate("Hello") => reply.map_err(|e| e.to_string()),
                    _ = input.interrupted() => Err(BackendError::Interrupted.to_string()),
                }
            }
            Err(e) => Err(e.to_string()),
        };
        pb.finish_and_clear();

        match result {
            Ok(_) => ConnectionCheck::Passed,
            Err(reason) => {
                tracing::warn!(target: "minicoder.config", error = %reason, "connection test failed");
                ConnectionCheck::Failed(reason)
            }
        }
    }
}

#[async_trait]
impl Command for InitCommand {
    fn name(&self) -> &str {
        "init"
    }

    fn alias(&self) -> Option<&str> {
        Some("i")
    }

    fn description(&self) -> &str {
        "Initialize MiniCoder configuration"
    }

    async fn execute(&self, args: &ParsedArguments) -> Result<()> {
        let args = InitArgs::from_parsed(args)?;
        self.run(&args).await?;
        Ok(())
    }
}

/// Prompt for one answer; blank input and end of stream are `None`
async fn answer(input: &mut dyn LineSource, prompt: &str) -> Result<Option<String>> {
    Ok(input
        .read_line(prompt)
        .await?
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty()))
}

/// Map a 1-based menu number or a model name to a model choice
fn model_choice(answer: &str) -> Option<&'static str> {
    if let Ok(n) = answer.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| MODEL_CHOICES.get(i))
            .map(|(model, _)| *model);
    }
    MODEL_CHOICES
        .iter()
        .map(|(model, _)| *model)
        .find(|model| *model == answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}

fn summary(settings: &Settings) -> String {
    let key = if settings.has_api_key() {
        "✔ configured".green().to_string()
    } else {
        "✖ not configured".yellow().to_string()
    };
    let proxy = settings
        .proxy()
        .map(str::to_string)
        .unwrap_or_else(|| "✖ not configured".dim().to_string());
    [
        format_key_value("API key", &key),
        format_key_value("Model", settings.model().unwrap_or("-")),
        format_key_value("Proxy", &proxy),
    ]
    .join("\n")
}

fn print_header(title: &str, subtitle: &str) {
    let border = "═".repeat(40);
    println!("\n{}", border.as_str().cyan());
    println!("{}", format!("  {}", title).cyan().bold());
    println!("{}", format!("  {}", subtitle).dark_grey());
    println!("{}", border.as_str().cyan());
}

fn print_section(title: &str) {
    println!("\n{}\n", format!("━━ {} ━━", title).cyan().bold());
}
