// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Gemini API client
//!
//! Implements `ChatBackend` against the Generative Language REST API
//! (`models/{model}:generateContent`).
//!
//! Configuration (API key, model, proxy, timeout) is read once when the client
//! is constructed. A settings change afterwards needs a new client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, NoProxy, Proxy};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{BackendError, MiniError, Result};
use crate::llm::backend::{BackendResult, ChatBackend};
use crate::llm::message::ChatMessage;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when neither an override nor the settings name one
pub const DEFAULT_MODEL: &str = "gemini-pro";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    proxy: Option<String>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from settings, optionally overriding the model.
    ///
    /// Fails before any network activity when no API key is configured or the
    /// proxy URL is invalid.
    pub fn new(settings: &Settings, model: Option<&str>) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                MiniError::Config(
                    "No API key configured. Set MINICODER_API_KEY or run 'mini init'.".to_string(),
                )
            })?;

        let model = model
            .map(str::to_string)
            .or_else(|| settings.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = Self::build_http_client(settings)?;

        tracing::debug!(
            target: "minicoder.gemini",
            model = %model,
            proxy = settings.proxy.is_some(),
            "gemini client constructed"
        );

        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_API_URL.to_string(),
            proxy: settings.proxy.clone(),
        })
    }

    /// Point the client at a different endpoint (tests, gateways)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Change the model for subsequent calls
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Configured proxy URL, if any
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    fn build_http_client(settings: &Settings) -> Result<Client> {
        let mut builder = Client::builder();

        if let Some(ref proxy_url) = settings.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                MiniError::Config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            let no_proxy = settings.no_proxy.as_deref().and_then(NoProxy::from_string);
            builder = builder.proxy(proxy.no_proxy(no_proxy));
        }

        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder
            .build()
            .map_err(|e| MiniError::Config(format!("Failed to build HTTP client: {}", e)))
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for a history and optional system instruction
    fn build_request(history: &[ChatMessage], system_prompt: Option<&str>) -> GeminiRequest {
        GeminiRequest {
            contents: history
                .iter()
                .map(|m| GeminiContent {
                    role: Some(m.role.as_str().to_string()),
                    parts: vec![GeminiPart {
                        text: m.content.clone(),
                    }],
                })
                .collect(),
            system_instruction: system_prompt.map(|text| GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: text.to_string(),
                }],
            }),
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: GeminiResponse) -> BackendResult<String> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            if let Some(reason) = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
            {
                return Err(BackendError::Blocked { reason });
            }
            return Err(BackendError::EmptyResponse);
        };

        Ok(candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }

    async fn call_api(&self, request: &GeminiRequest) -> BackendResult<GeminiResponse> {
        tracing::debug!(
            target: "minicoder.gemini",
            model = %self.model,
            messages = request.contents.len(),
            system = request.system_instruction.is_some(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: "minicoder.gemini",
                status = status.as_u16(),
                model = %self.model,
                "gemini request failed"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> BackendResult<String> {
        let request = Self::build_request(&[ChatMessage::user(prompt)], None);
        let response = self.call_api(&request).await?;
        Self::extract_text(response)
    }

    async fn chat(
        &self,
        history: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> BackendResult<String> {
        let request = Self::build_request(history, system_prompt);
        let response = self.call_api(&request).await?;
        Self::extract_text(response)
    }
}

// === Wire types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
