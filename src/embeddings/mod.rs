// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Embedding providers
//!
//! The embedding model is an opaque external service behind the
//! [`EmbeddingProvider`] trait. Two implementations:
//!
//! - [`HashEmbedder`]: deterministic SHA-256-derived bag-of-tokens vectors.
//!   No network, identical input always yields the identical vector. The
//!   default, and what tests run against.
//! - [`HttpEmbeddingClient`]: OpenAI-style `/embeddings` endpoint.

mod http_client;

pub use http_client::HttpEmbeddingClient;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::errors::ChatResult;

/// External embedding service: `embed(text) -> vector`, deterministic for
/// identical input and model configuration.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> ChatResult<Vec<f32>>;

    /// Fixed output dimension of this provider
    fn dimension(&self) -> usize;
}

/// Deterministic hash-based embedder.
///
/// Each lowercased whitespace token is hashed with SHA-256 and expanded into
/// a signed contribution vector; token contributions are summed and the
/// result L2-normalized. Texts sharing tokens land near each other, which is
/// enough signal for retrieval over a single small corpus and keeps the
/// whole pipeline reproducible offline.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn token_contribution(&self, token: &str) -> Vec<f32> {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let hash = hasher.finalize();

        let mut values = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            let byte_value = hash[i % hash.len()];
            // Rotate the hash per lane so dimensions beyond 32 stay distinct
            let lane = (i / hash.len()) as u8;
            let mixed = byte_value.wrapping_add(lane.wrapping_mul(97));
            // Map byte to [-1, 1]
            values.push((mixed as f32 / 255.0) * 2.0 - 1.0);
        }
        values
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> ChatResult<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text.to_lowercase().split_whitespace() {
            let cleaned: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
            if cleaned.is_empty() {
                continue;
            }
            for (slot, value) in vector.iter_mut().zip(self.token_contribution(&cleaned)) {
                *slot += value;
            }
        }

        normalize(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Normalize to unit length; zero vectors are left untouched
pub fn normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return;
    }
    for value in vector.iter_mut() {
        *value /= magnitude;
    }
}
