// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! OpenAI-style chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use super::LlmClient;
use crate::errors::{ChatError, ChatResult};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Always requests temperature 0 (greedy decoding) so answers are
/// deterministic for identical prompts. Every call is bounded by the
/// configured timeout; a timeout surfaces as a `Generation` error, never a
/// hang.
pub struct HttpLlmClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    request_timeout: Duration,
}

impl HttpLlmClient {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        request_timeout: Duration,
    ) -> ChatResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ChatError::Generation(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
            request_timeout,
        })
    }

    async fn send_request(&self, prompt: &str) -> ChatResult<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::Generation(format!(
                    "model call timed out after {}s",
                    self.request_timeout.as_secs()
                ))
            } else {
                ChatError::Generation(format!("model call failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Generation(format!(
                "model service returned {}: {}",
                status, message
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Generation(format!("invalid model response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ChatError::Generation("model returned no choices".to_string()))
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn generate(&self, prompt: &str) -> ChatResult<String> {
        // Outer timeout guards the whole call even if the connection stalls
        // in a way reqwest's own timeout does not cover
        match timeout(self.request_timeout, self.send_request(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::Generation(format!(
                "model call timed out after {}s",
                self.request_timeout.as_secs()
            ))),
        }
    }
}
