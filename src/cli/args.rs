// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Raw argument parsing
//!
//! Turns the process arguments into a command name plus a loosely typed
//! options/positional bag, and converts that bag into the typed flag structs
//! each command expects.
//!
//! Parsing rules:
//! - `--name value` stores `value` under `name` unless the next token starts with `-`
//!   or there is no next token, in which case `name` is a boolean flag.
//! - `-x` is always a boolean flag; single-dash flags never consume a value.
//! - anything else is positional, in order.
//!
//! Unknown flags are passed through; commands decide what they accept.

use std::collections::HashMap;

use crate::error::{MiniError, Result};

/// Value stored for an option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Flag given without a value
    Flag,
    /// Flag followed by a non-flag token
    Value(String),
}

/// How a single raw token was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    /// `--name`, with or without a following value
    LongFlag(String),
    /// `-x`
    ShortFlag(String),
    /// The token right after a `--name` that was consumed as its value
    FlagValue,
    /// Anything else
    Positional,
}

/// Options and positional arguments of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    positional: Vec<String>,
    options: HashMap<String, OptionValue>,
}

impl ParsedArguments {
    /// Positional arguments in the order they were given
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// All options keyed by flag name (prefix stripped)
    pub fn options(&self) -> &HashMap<String, OptionValue> {
        &self.options
    }

    /// Raw option value
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Whether the flag was given at all, with or without a value
    pub fn has(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// String value of an option; `--name` given without a value is a usage error
    pub fn string(&self, name: &str) -> Result<Option<String>> {
        match self.options.get(name) {
            None => Ok(None),
            Some(OptionValue::Value(value)) => Ok(Some(value.clone())),
            Some(OptionValue::Flag) => Err(MiniError::Usage(format!(
                "Option --{} requires a value",
                name
            ))),
        }
    }

    /// Builder used by tests and by commands that forward arguments
    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    /// Builder used by tests and by commands that forward arguments
    pub fn with_positional(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }
}

/// Classify every raw token exactly once.
pub fn classify<S: AsRef<str>>(raw: &[S]) -> Vec<TokenClass> {
    let mut classes = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let token = raw[i].as_ref();

        if let Some(name) = token.strip_prefix("--") {
            classes.push(TokenClass::LongFlag(name.to_string()));
            let takes_value = raw
                .get(i + 1)
                .map(|next| !next.as_ref().starts_with('-'))
                .unwrap_or(false);
            if takes_value {
                classes.push(TokenClass::FlagValue);
                i += 2;
            } else {
                i += 1;
            }
        } else if let Some(name) = token.strip_prefix('-') {
            classes.push(TokenClass::ShortFlag(name.to_string()));
            i += 1;
        } else {
            classes.push(TokenClass::Positional);
            i += 1;
        }
    }

    classes
}

/// Parse raw arguments (everything after the command name).
pub fn parse<S: AsRef<str>>(raw: &[S]) -> ParsedArguments {
    let mut parsed = ParsedArguments::default();
    let classes = classify(raw);

    for (i, class) in classes.iter().enumerate() {
        match class {
            TokenClass::LongFlag(name) => {
                let value = match classes.get(i + 1) {
                    Some(TokenClass::FlagValue) => {
                        OptionValue::Value(raw[i + 1].as_ref().to_string())
                    }
                    _ => OptionValue::Flag,
                };
                parsed.options.insert(name.clone(), value);
            }
            TokenClass::ShortFlag(name) => {
                parsed.options.insert(name.clone(), OptionValue::Flag);
            }
            TokenClass::FlagValue => {}
            TokenClass::Positional => parsed.positional.push(raw[i].as_ref().to_string()),
        }
    }

    parsed
}

/// What the process was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// No command, or `--help`/`-h` in command position
    Help,
    /// Run the named command with the parsed remainder
    Run {
        command: String,
        args: ParsedArguments,
    },
}

/// Resolve the arguments following the binary name.
pub fn resolve_invocation<S: AsRef<str>>(argv: &[S]) -> Invocation {
    match argv.split_first() {
        None => Invocation::Help,
        Some((first, _)) if matches!(first.as_ref(), "--help" | "-h") => Invocation::Help,
        Some((first, rest)) => Invocation::Run {
            command: first.as_ref().to_string(),
            args: parse(rest),
        },
    }
}

/// Flags handled by the process rather than by a command
pub const GLOBAL_FLAGS: &[&str] = &["--verbose"];

/// Split `argv` into the global flags before the command name and the rest.
///
/// Global flags after the command name stay with the command's arguments.
pub fn split_global_flags<S: AsRef<str>>(argv: &[S]) -> (&[S], &[S]) {
    let leading = argv
        .iter()
        .take_while(|a| GLOBAL_FLAGS.contains(&a.as_ref()))
        .count();
    argv.split_at(leading)
}

/// Whether verbose logging was requested anywhere on the command line
pub fn wants_verbose<S: AsRef<str>>(argv: &[S]) -> bool {
    argv.iter().any(|a| a.as_ref() == "--verbose")
}

// === Typed flag structs, validated at the command edge ===

/// Arguments for the chat command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model override
    pub model: Option<String>,
}

impl ChatArgs {
    pub fn from_parsed(args: &ParsedArguments) -> Result<Self> {
        Ok(Self {
            model: args.string("model")?,
        })
    }
}

/// Arguments for the ask command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskArgs {
    /// The question; first positional argument
    pub prompt: String,
    /// Model override
    pub model: Option<String>,
}

impl AskArgs {
    pub fn from_parsed(args: &ParsedArguments) -> Result<Self> {
        let prompt = args
            .positional()
            .first()
            .filter(|p| !p.is_empty())
            .cloned()
            .ok_or_else(|| {
                MiniError::Usage(
                    "Please provide a question, for example: mini ask \"Hello\"".to_string(),
                )
            })?;

        Ok(Self {
            prompt,
            model: args.string("model")?,
        })
    }
}

/// Arguments for the init command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitArgs {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub proxy: Option<String>,
    /// Save to the project file instead of the user file
    pub local: bool,
}

impl InitArgs {
    pub fn from_parsed(args: &ParsedArguments) -> Result<Self> {
        Ok(Self {
            api_key: args.string("api-key")?,
            model: args.string("model")?,
            proxy: args.string("proxy")?,
            local: args.has("local"),
        })
    }
}

/// Arguments for the hello command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloArgs {
    pub name: Option<String>,
}

impl HelloArgs {
    pub fn from_parsed(args: &ParsedArguments) -> Result<Self> {
        Ok(Self {
            name: args.string("name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_empty() {
        let parsed = parse::<&str>(&[]);
        assert!(parsed.options().is_empty());
        assert!(parsed.positional().is_empty());
    }

    #[test]
    fn test_parse_long_flag_with_value() {
        let parsed = parse(&["--model", "gemini-pro", "hi"]);
        assert_eq!(
            parsed.option("model"),
            Some(&OptionValue::Value("gemini-pro".to_string()))
        );
        assert_eq!(parsed.positional(), &["hi".to_string()]);
    }

    #[test]
    fn test_parse_boolean_flags() {
        let parsed = parse(&["--verbose", "-x", "foo"]);
        assert_eq!(parsed.option("verbose"), Some(&OptionValue::Flag));
        assert_eq!(parsed.option("x"), Some(&OptionValue::Flag));
        assert_eq!(parsed.positional(), &["foo".to_string()]);
        assert_eq!(parsed.options().len(), 2);
    }

    #[test]
    fn test_parse_trailing_long_flag_is_boolean() {
        let parsed = parse(&["--name"]);
        assert_eq!(parsed.option("name"), Some(&OptionValue::Flag));
        assert!(parsed.positional().is_empty());
    }

    #[test]
    fn test_short_flag_never_consumes_value() {
        let parsed = parse(&["-m", "gemini-pro"]);
        assert_eq!(parsed.option("m"), Some(&OptionValue::Flag));
        assert_eq!(parsed.positional(), &["gemini-pro".to_string()]);
    }

    #[test]
    fn test_long_flag_followed_by_short_flag() {
        let parsed = parse(&["--local", "-v"]);
        assert_eq!(parsed.option("local"), Some(&OptionValue::Flag));
        assert_eq!(parsed.option("v"), Some(&OptionValue::Flag));
    }

    #[test]
    fn test_repeated_flag_last_wins() {
        let parsed = parse(&["--model", "a", "--model", "b"]);
        assert_eq!(
            parsed.option("model"),
            Some(&OptionValue::Value("b".to_string()))
        );

        let parsed = parse(&["--model", "a", "--model"]);
        assert_eq!(parsed.option("model"), Some(&OptionValue::Flag));
    }

    #[test]
    fn test_positional_order_preserved() {
        let parsed = parse(&["one", "--flag", "-s", "two", "three"]);
        assert_eq!(
            parsed.positional(),
            &["one".to_string(), "two".to_string(), "three".to_string()]
        );
        assert_eq!(parsed.option("flag"), Some(&OptionValue::Flag));
        assert_eq!(parsed.option("s"), Some(&OptionValue::Flag));
    }

    #[test]
    fn test_classify_marks_consumed_value() {
        let classes = classify(&["--model", "x", "-v", "rest"]);
        assert_eq!(
            classes,
            vec![
                TokenClass::LongFlag("model".to_string()),
                TokenClass::FlagValue,
                TokenClass::ShortFlag("v".to_string()),
                TokenClass::Positional,
            ]
        );
    }

    #[test]
    fn test_negative_number_is_not_consumed() {
        let parsed = parse(&["--offset", "-5"]);
        assert_eq!(parsed.option("offset"), Some(&OptionValue::Flag));
        assert_eq!(parsed.option("5"), Some(&OptionValue::Flag));
    }

    #[test]
    fn test_string_option_rejects_boolean() {
        let parsed = parse(&["--model"]);
        let err = parsed.string("model").unwrap_err();
        assert!(matches!(err, MiniError::Usage(_)));
        assert!(err.to_string().contains("--model"));
    }

    #[test]
    fn test_resolve_invocation_help() {
        assert_eq!(resolve_invocation::<&str>(&[]), Invocation::Help);
        assert_eq!(resolve_invocation(&["--help"]), Invocation::Help);
        assert_eq!(resolve_invocation(&["-h", "chat"]), Invocation::Help);
    }

    #[test]
    fn test_resolve_invocation_run() {
        let invocation = resolve_invocation(&["ask", "--model", "m", "question"]);
        match invocation {
            Invocation::Run { command, args } => {
                assert_eq!(command, "ask");
                assert_eq!(args.string("model").unwrap(), Some("m".to_string()));
                assert_eq!(args.positional(), &["question".to_string()]);
            }
            Invocation::Help => panic!("Expected Run invocation"),
        }
    }

    #[test]
    fn test_wants_verbose() {
        assert!(wants_verbose(&["chat", "--verbose"]));
        assert!(!wants_verbose(&["chat", "-v"]));
    }

    #[test]
    fn test_split_global_flags_only_before_command() {
        let (global, rest) = split_global_flags(&["--verbose", "ask", "q", "--verbose"]);
        assert_eq!(global, &["--verbose"]);
        assert_eq!(rest, &["ask", "q", "--verbose"]);

        let parsed = parse(&rest[1..]);
        assert_eq!(parsed.positional(), &["q".to_string()]);
        assert_eq!(parsed.option("verbose"), Some(&OptionValue::Flag));

        let (global, rest) = split_global_flags(&["ask", "--", "--verbose"]);
        assert!(global.is_empty());
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn test_ask_args_requires_prompt() {
        let err = AskArgs::from_parsed(&parse::<&str>(&[])).unwrap_err();
        assert!(matches!(err, MiniError::Usage(_)));
    }

    #[test]
    fn test_ask_args_takes_first_positional() {
        let args = AskArgs::from_parsed(&parse(&["what is rust?", "ignored", "--model", "m"]))
            .unwrap();
        assert_eq!(args.prompt, "what is rust?");
        assert_eq!(args.model, Some("m".to_string()));
    }

    #[test]
    fn test_chat_args_model() {
        let args = ChatArgs::from_parsed(&parse(&["--model", "gemini-2.5-pro"])).unwrap();
        assert_eq!(args.model, Some("gemini-2.5-pro".to_string()));
        assert_eq!(ChatArgs::from_parsed(&parse::<&str>(&[])).unwrap().model, None);
    }

    #[test]
    fn test_init_args() {
        let args = InitArgs::from_parsed(&parse(&[
            "--api-key",
            "k",
            "--proxy",
            "http://127.0.0.1:7890",
            "--local",
        ]))
        .unwrap();
        assert_eq!(args.api_key, Some("k".to_string()));
        assert_eq!(args.proxy, Some("http://127.0.0.1:7890".to_string()));
        assert_eq!(args.model, None);
        assert!(args.local);
    }

    #[test]
    fn test_bare_dash_tokens() {
        let parsed = parse(&["--", "x"]);
        assert_eq!(parsed.option(""), Some(&OptionValue::Value("x".to_string())));
        assert!(parsed.positional().is_empty());

        let parsed = parse(&["-", "x"]);
        assert_eq!(parsed.option(""), Some(&OptionValue::Flag));
        assert_eq!(parsed.positional(), &["x".to_string()]);

        let parsed = parse(&["--name", "", ""]);
        assert_eq!(parsed.option("name"), Some(&OptionValue::Value(String::new())));
        assert_eq!(parsed.positional(), &[String::new()]);
    }

    fn token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{1,6}",
            "--[a-z]{1,6}",
            "-[a-z]{1,2}",
            Just(String::new()),
            Just("-".to_string()),
            Just("--".to_string()),
            Just("-1".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_every_token_classified_once(raw in proptest::collection::vec(token_strategy(), 0..12)) {
            let classes = classify(&raw);
            prop_assert_eq!(classes.len(), raw.len());

            for (i, class) in classes.iter().enumerate() {
                match class {
                    TokenClass::FlagValue => {
                        prop_assert!(i > 0);
                        prop_assert!(matches!(classes[i - 1], TokenClass::LongFlag(_)));
                        prop_assert!(!raw[i].starts_with('-'));
                    }
                    TokenClass::LongFlag(name) => prop_assert_eq!(format!("--{}", name), raw[i].clone()),
                    TokenClass::ShortFlag(name) => prop_assert_eq!(format!("-{}", name), raw[i].clone()),
                    TokenClass::Positional => prop_assert!(!raw[i].starts_with('-')),
                }
            }
        }

        #[test]
        fn prop_positional_count_matches(raw in proptest::collection::vec(token_strategy(), 0..12)) {
            let classes = classify(&raw);
            let parsed = parse(&raw);
            let expected = classes.iter().filter(|c| matches!(c, TokenClass::Positional)).count();
            prop_assert_eq!(parsed.positional().len(), expected);
        }
    }
}
