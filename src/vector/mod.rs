// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Vector index over corpus chunks
//!
//! Holds (chunk, embedding) pairs and answers exact cosine top-k queries.
//! The index is immutable once built and is shared across concurrent
//! retrievals via `Arc` without locking. Stable sort plus insertion-order
//! entries make result ordering exactly reproducible for identical index
//! state, including after a save/load round-trip.

mod persistence;

use serde::{Deserialize, Serialize};

use crate::corpus::Chunk;
use crate::errors::{ChatError, ChatResult};

/// A chunk returned from retrieval with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// Searchable index of (chunk, embedding) pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Add a chunk with its embedding.
    ///
    /// Rejects embeddings whose dimension does not match the index, and
    /// embeddings containing NaN or Infinity (they would corrupt every
    /// subsequent similarity comparison).
    pub fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) -> ChatResult<()> {
        if embedding.len() != self.dimension {
            return Err(ChatError::Embedding(format!(
                "invalid embedding dimensions: expected {}, got {}",
                self.dimension,
                embedding.len()
            )));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(ChatError::Embedding(
                "embedding contains NaN or Infinity values".to_string(),
            ));
        }

        self.entries.push(IndexEntry { chunk, embedding });
        Ok(())
    }

    /// Top-k chunks by descending cosine similarity.
    ///
    /// Returns fewer than k results when the index is smaller; an empty
    /// index yields an empty result, never an error. Ties resolve to
    /// insertion order (stable sort), so identical index state always
    /// produces identical ordering.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        if self.entries.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        results
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity between two vectors; mismatched dimensions or zero
/// magnitude score 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}
