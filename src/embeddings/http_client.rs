// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! OpenAI-style embedding service client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::EmbeddingProvider;
use crate::errors::{ChatError, ChatResult};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embedding client for an OpenAI-compatible `/embeddings` endpoint
pub struct HttpEmbeddingClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
}

impl HttpEmbeddingClient {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        dimension: usize,
        timeout: Duration,
    ) -> ChatResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Embedding(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> ChatResult<Vec<f32>> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: text,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::Embedding("embedding request timed out".to_string())
            } else {
                ChatError::Embedding(format!("embedding request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Embedding(format!(
                "embedding service returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Embedding(format!("invalid embedding response: {}", e)))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ChatError::Embedding("embedding response was empty".to_string()))?;

        if vector.len() != self.dimension {
            return Err(ChatError::Embedding(format!(
                "embedding dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.len()
            )));
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
