// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the retrieval-augmented chat core
//!
//! Startup errors (corpus, index persistence, configuration) are fatal:
//! a broken index would leave every subsequent answer ungrounded, so
//! initialization aborts instead of degrading. Per-turn errors (embedding,
//! generation) are recoverable and surfaced as a visible error reply
//! without mutating session state.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the chat core
#[derive(Error, Debug)]
pub enum ChatError {
    /// Source corpus could not be read
    #[error("Failed to read corpus at {path}: {source}")]
    CorpusLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Vector index could not be saved or loaded
    #[error("Index persistence failed at {path}: {reason}")]
    IndexPersistence { path: PathBuf, reason: String },

    /// Embedding service call failed
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Language model call failed or timed out
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Empty or whitespace-only user input, rejected before touching
    /// session state
    #[error("Invalid session input: {0}")]
    InvalidSessionInput(String),

    /// Invalid startup configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl ChatError {
    /// Get error code for logging and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::CorpusLoad { .. } => "CORPUS_LOAD",
            ChatError::IndexPersistence { .. } => "INDEX_PERSISTENCE",
            ChatError::Embedding(_) => "EMBEDDING_FAILED",
            ChatError::Generation(_) => "GENERATION_FAILED",
            ChatError::InvalidSessionInput(_) => "INVALID_SESSION_INPUT",
            ChatError::Config(_) => "CONFIG_INVALID",
        }
    }

    /// Fatal errors abort initialization; the process must not accept turns
    /// with a missing or partial index.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChatError::CorpusLoad { .. }
                | ChatError::IndexPersistence { .. }
                | ChatError::Config(_)
        )
    }

    /// Recoverable per-turn errors leave the session untouched, so the same
    /// turn is safe to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatError::Embedding(_) | ChatError::Generation(_))
    }
}
