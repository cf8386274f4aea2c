// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Language model boundary
//!
//! The model is an opaque external service behind the [`LlmClient`] trait.
//! `build_prompt` assembles the single generation prompt in fixed order:
//! system instruction, context block, chronological history, then the new
//! question, with a trailing `Assistant:` cue. Generation runs at zero
//! temperature so identical prompts yield identical answers.

mod client;
mod prompt;

pub use client::HttpLlmClient;
pub use prompt::build_prompt;

use async_trait::async_trait;

use crate::errors::ChatResult;

/// External language model service: `generate(prompt, temperature=0)`.
/// May fail or time out; both surface as a `Generation` error.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> ChatResult<String>;
}
