// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Per-session conversation memory
//!
//! Process-wide mapping from session id to conversation state. The store's
//! own lock guards only map access; each session carries its own
//! `tokio::sync::Mutex`, which the orchestrator holds for the whole turn so
//! concurrent turns on the same id serialize while different ids proceed
//! independently.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One utterance in a session's history. Append-only, ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// State owned by exactly one session id.
///
/// `awaiting_handover` is true iff the most recently appended assistant turn
/// is a handover offer not yet resolved by a yes/no reply.
#[derive(Debug, Default)]
pub struct SessionState {
    pub history: Vec<ConversationTurn>,
    pub awaiting_handover: bool,
    max_history_turns: usize,
}

impl SessionState {
    fn new(max_history_turns: usize) -> Self {
        Self {
            history: Vec::new(),
            awaiting_handover: false,
            max_history_turns,
        }
    }

    /// Append a turn, pruning oldest turns first when bounded retention is
    /// configured (0 = unlimited)
    pub fn append(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
        if self.max_history_turns > 0 && self.history.len() > self.max_history_turns {
            let excess = self.history.len() - self.max_history_turns;
            self.history.drain(..excess);
        }
    }

    /// Reset to empty state; retention configuration is kept
    pub fn reset(&mut self) {
        self.history.clear();
        self.awaiting_handover = false;
    }
}

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Process-wide session registry
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    max_history_turns: usize,
}

impl SessionStore {
    pub fn new(max_history_turns: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_history_turns,
        }
    }

    /// Return the existing session or atomically create an empty one.
    ///
    /// The single write lock makes check-and-insert atomic, so concurrent
    /// first-contact requests on the same id always receive the same state
    /// object.
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, "Created session");
                Arc::new(Mutex::new(SessionState::new(self.max_history_turns)))
            })
            .clone()
    }

    /// Reset a session to empty state. No-op for unknown ids.
    pub async fn clear(&self, session_id: &str) {
        let handle = {
            let sessions = self.sessions.read().await;
            sessions.get(session_id).cloned()
        };
        if let Some(handle) = handle {
            // Waits for any in-flight turn on this session to finish
            let mut state = handle.lock().await;
            state.reset();
            tracing::debug!(session_id, "Cleared session");
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
