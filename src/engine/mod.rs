// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Conversation orchestrator
//!
//! Ties the pipeline together per turn: input validation, session lookup,
//! handover confirmation handling, retrieval, context composition,
//! generation, fallback classification, and the history update. History is
//! appended only after a turn fully succeeds, so a failed or timed-out
//! generation leaves the session exactly as it was and the turn is safe to
//! retry.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AssistantConfig;
use crate::corpus::{chunk_document, load_corpus};
use crate::embeddings::EmbeddingProvider;
use crate::errors::{ChatError, ChatResult};
use crate::handover::{is_fallback, parse_confirmation, Confirmation};
use crate::llm::{build_prompt, LlmClient};
use crate::session::{ConversationTurn, SessionState, SessionStore};
use crate::vector::{ScoredChunk, VectorIndex};

/// Join retrieved chunk texts into one context block, preserving retrieval
/// order. Pure; empty retrieval composes to an empty string.
pub fn compose_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|scored| scored.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Load the persisted index if one exists at the configured path, otherwise
/// build it from the corpus and persist it.
///
/// The load path is a caching optimization: a loaded index answers queries
/// identically to the freshly built one. Corpus and persistence failures are
/// fatal; a partial index must never serve retrievals.
pub async fn build_or_load_index(
    config: &AssistantConfig,
    embedder: &dyn EmbeddingProvider,
) -> ChatResult<VectorIndex> {
    if config.index_path.exists() {
        tracing::info!(path = %config.index_path.display(), "Found persisted index, loading");
        let index = VectorIndex::load(&config.index_path)?;
        if index.dimension() != embedder.dimension() {
            return Err(ChatError::IndexPersistence {
                path: config.index_path.clone(),
                reason: format!(
                    "index dimension {} does not match embedder dimension {}",
                    index.dimension(),
                    embedder.dimension()
                ),
            });
        }
        return Ok(index);
    }

    let started = Instant::now();
    let text = load_corpus(&config.corpus_path)?;
    let chunks = chunk_document(&text, config.chunk_size, config.chunk_overlap);
    tracing::info!(chunks = chunks.len(), "Building vector index from corpus");

    let mut index = VectorIndex::new(embedder.dimension());
    for chunk in chunks {
        let embedding = embedder.embed(&chunk.text).await?;
        index.insert(chunk, embedding)?;
    }

    index.save(&config.index_path)?;
    tracing::info!(
        chunks = index.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Index built and persisted"
    );
    Ok(index)
}

/// The retrieval-augmented dialogue core.
///
/// Exposes exactly one per-turn operation, [`handle_turn`], and one
/// administrative operation, [`reset_session`]. Rendering, input collection,
/// and the actual transfer to a human operator belong to external
/// collaborators.
///
/// [`handle_turn`]: ChatEngine::handle_turn
/// [`reset_session`]: ChatEngine::reset_session
pub struct ChatEngine {
    config: AssistantConfig,
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmClient>,
    sessions: SessionStore,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("config", &self.config)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl ChatEngine {
    /// Initialize the engine: validate configuration and build or load the
    /// index. Any failure here is fatal; the engine must not accept turns
    /// over a broken index.
    pub async fn new(
        config: AssistantConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmClient>,
    ) -> ChatResult<Self> {
        config.validate()?;
        let index = build_or_load_index(&config, embedder.as_ref()).await?;
        let sessions = SessionStore::new(config.max_history_turns);

        Ok(Self {
            config,
            index: Arc::new(index),
            embedder,
            llm,
            sessions,
        })
    }

    /// Handle one user turn and return the text to display.
    ///
    /// Turns on the same session id serialize on the session's own lock;
    /// different sessions proceed independently. Recoverable per-turn
    /// failures (embedding/generation) return the apologetic error reply
    /// and leave the session untouched.
    pub async fn handle_turn(&self, session_id: &str, user_text: &str) -> ChatResult<String> {
        if user_text.trim().is_empty() {
            return Err(ChatError::InvalidSessionInput(
                "user text is empty or whitespace-only".to_string(),
            ));
        }

        let handle = self.sessions.get_or_create(session_id).await;
        let mut state = handle.lock().await;

        if state.awaiting_handover {
            return Ok(self.resolve_confirmation(session_id, &mut state, user_text));
        }

        match self.answer_question(&state.history, user_text).await {
            Ok(answer) => {
                let display = if is_fallback(&answer, &self.config.fallback_markers) {
                    tracing::info!(session_id, "Answer classified as fallback, offering handover");
                    state.awaiting_handover = true;
                    self.config.messages.handover_offer.clone()
                } else {
                    answer
                };
                state.append(ConversationTurn::user(user_text));
                state.append(ConversationTurn::assistant(display.clone()));
                Ok(display)
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!(
                    session_id,
                    code = e.error_code(),
                    error = %e,
                    "Turn failed, session left unchanged"
                );
                Ok(self.config.messages.error_reply.clone())
            }
            Err(e) => Err(e),
        }
    }

    /// Reset a session to empty state (explicit "reset conversation")
    pub async fn reset_session(&self, session_id: &str) {
        self.sessions.clear(session_id).await;
    }

    /// Snapshot of a session's history, oldest first. Creates the session
    /// if it does not exist yet, like any other first contact.
    pub async fn session_history(&self, session_id: &str) -> Vec<ConversationTurn> {
        let handle = self.sessions.get_or_create(session_id).await;
        let state = handle.lock().await;
        state.history.clone()
    }

    /// Number of sessions currently registered
    pub async fn session_count(&self) -> usize {
        self.sessions.session_count().await
    }

    /// Retrieval-augmented generation for one question. No session
    /// mutation happens here.
    async fn answer_question(
        &self,
        history: &[ConversationTurn],
        question: &str,
    ) -> ChatResult<String> {
        let query = self.embedder.embed(question).await?;
        let retrieved = self.index.search(&query, self.config.retrieval_k);
        tracing::debug!(
            retrieved = retrieved.len(),
            k = self.config.retrieval_k,
            "Retrieved context chunks"
        );

        let context = compose_context(&retrieved);
        let prompt = build_prompt(&self.config.system_instruction, &context, history, question);
        self.llm.generate(&prompt).await
    }

    /// Interpret input as a yes/no reply to a pending handover offer. The
    /// retrieval/generation pipeline is bypassed entirely; the reply is
    /// recorded in history either way.
    fn resolve_confirmation(
        &self,
        session_id: &str,
        state: &mut SessionState,
        user_text: &str,
    ) -> String {
        let reply = match parse_confirmation(user_text) {
            Confirmation::Yes => {
                tracing::info!(session_id, "Handover accepted, emitting transfer message");
                state.awaiting_handover = false;
                self.config.messages.transfer.clone()
            }
            Confirmation::No => {
                tracing::info!(session_id, "Handover declined");
                state.awaiting_handover = false;
                self.config.messages.decline_ack.clone()
            }
            Confirmation::Unrecognized => {
                tracing::debug!(session_id, "Unrecognized confirmation reply, reprompting");
                self.config.messages.reprompt.clone()
            }
        };

        state.append(ConversationTurn::user(user_text));
        state.append(ConversationTurn::assistant(reply.clone()));
        reply
    }
}
