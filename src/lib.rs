// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmented conversational assistant core.
//!
//! Answers questions by grounding a language model in a fixed knowledge
//! corpus, keeps per-session conversation memory, and negotiates handover
//! to a human operator when an answer is classified low-confidence.

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod engine;
pub mod errors;
pub mod handover;
pub mod llm;
pub mod session;
pub mod vector;

pub use config::AssistantConfig;
pub use embeddings::{EmbeddingProvider, HashEmbedder, HttpEmbeddingClient};
pub use engine::ChatEngine;
pub use errors::{ChatError, ChatResult};
pub use llm::{HttpLlmClient, LlmClient};
pub use session::{ConversationTurn, Role};
