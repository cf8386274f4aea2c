// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Startup configuration for the assistant
//!
//! All knobs the core consumes are supplied here: corpus location, chunking
//! parameters, retrieval k, fallback marker phrases, the system persona, the
//! fixed negotiation sentences, and external service endpoints. Loaded from a
//! TOML file with environment-variable overrides for deployment secrets.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::errors::{ChatError, ChatResult};

/// Verbatim fallback sentence the model is instructed to emit when uncertain.
/// Must stay aligned with the default marker list below.
pub const DEFAULT_FALLBACK_SENTENCE: &str =
    "I'm not confident I can assist with that. Let me connect you to a live agent.";

fn default_corpus_path() -> PathBuf {
    PathBuf::from("data/knowledge_base.txt")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("vector_store/index.bin")
}

fn default_chunk_size() -> usize {
    600
}

fn default_chunk_overlap() -> usize {
    80
}

fn default_retrieval_k() -> usize {
    5
}

fn default_embedding_dimension() -> usize {
    384
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_fallback_markers() -> Vec<String> {
    [
        "i'm not confident",
        "let me connect you to a live agent",
        "i'm unable to assist",
        "i do not have that information",
        "this may require a human agent",
        "cannot confidently answer",
        "not covered in the documents",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_system_instruction() -> String {
    format!(
        "You are the company's virtual assistant.\n\n\
         Your job is to help users by retrieving only known and verified information \
         from the provided context. Never guess or speculate.\n\n\
         Brand voice:\n\
         - Optimistic and confident\n\
         - Clear and concise\n\
         - Friendly but professional\n\n\
         Formatting guidelines:\n\
         - Use numbered steps or bullet points for clarity\n\
         - Answer in plain language and avoid jargon\n\
         - If unsure or the information is unavailable, respond exactly with:\n\
         \x20 {}\n\n\
         Important:\n\
         - Never fabricate information\n\
         - Always remain helpful and courteous",
        DEFAULT_FALLBACK_SENTENCE
    )
}

/// Fixed sentences used by the handover negotiation and error paths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseMessages {
    /// Shown instead of the raw fallback answer; asks for yes/no
    #[serde(default = "ResponseMessages::default_handover_offer")]
    pub handover_offer: String,

    /// Emitted on "yes"; actual transfer is an external collaborator
    #[serde(default = "ResponseMessages::default_transfer")]
    pub transfer: String,

    /// Emitted on "no"
    #[serde(default = "ResponseMessages::default_decline_ack")]
    pub decline_ack: String,

    /// Emitted on anything that is not a yes/no while awaiting confirmation
    #[serde(default = "ResponseMessages::default_reprompt")]
    pub reprompt: String,

    /// Apologetic reply when generation fails; never appended to history
    #[serde(default = "ResponseMessages::default_error_reply")]
    pub error_reply: String,
}

impl ResponseMessages {
    fn default_handover_offer() -> String {
        "I'm not confident I can assist with that. Would you like me to connect you \
         to a live agent? (yes/no)"
            .to_string()
    }

    fn default_transfer() -> String {
        "Connecting you to a live agent...".to_string()
    }

    fn default_decline_ack() -> String {
        "No problem! Feel free to ask another question.".to_string()
    }

    fn default_reprompt() -> String {
        "Please respond with 'yes' or 'no'.".to_string()
    }

    fn default_error_reply() -> String {
        "Sorry, something went wrong while answering. Please try again.".to_string()
    }
}

impl Default for ResponseMessages {
    fn default() -> Self {
        Self {
            handover_offer: Self::default_handover_offer(),
            transfer: Self::default_transfer(),
            decline_ack: Self::default_decline_ack(),
            reprompt: Self::default_reprompt(),
            error_reply: Self::default_error_reply(),
        }
    }
}

/// External language model endpoint settings (OpenAI-style chat completions)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmSettings {
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: String,
    pub api_key: Option<String>,
}

/// External embedding endpoint settings; when absent, the deterministic
/// hash embedder is used instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: String,
    pub api_key: Option<String>,
}

/// Complete startup configuration surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,

    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Maximum characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters of overlap between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Top-k chunks retrieved per question
    #[serde(default = "default_retrieval_k")]
    pub retrieval_k: usize,

    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Timeout for external embedding/LLM calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Bounded history retention; 0 keeps the full history (base design).
    /// Setting a cap is a documented deviation knob.
    #[serde(default)]
    pub max_history_turns: usize,

    /// Case-insensitive substrings that classify an answer as fallback
    #[serde(default = "default_fallback_markers")]
    pub fallback_markers: Vec<String>,

    /// System persona and scope instruction prepended to every prompt
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,

    #[serde(default)]
    pub messages: ResponseMessages,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub embedding: EmbeddingSettings,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            index_path: default_index_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            retrieval_k: default_retrieval_k(),
            embedding_dimension: default_embedding_dimension(),
            request_timeout_secs: default_request_timeout_secs(),
            max_history_turns: 0,
            fallback_markers: default_fallback_markers(),
            system_instruction: default_system_instruction(),
            messages: ResponseMessages::default(),
            llm: LlmSettings::default(),
            embedding: EmbeddingSettings::default(),
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file, then apply env overrides and
    /// validate.
    pub fn load(path: &Path) -> ChatResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;

        let mut config: AssistantConfig = toml::from_str(&raw)
            .map_err(|e| ChatError::Config(format!("invalid config file: {}", e)))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus env overrides, for running without a config file
    pub fn from_env() -> ChatResult<Self> {
        let mut config = AssistantConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Deployment overrides; secrets in particular come from the environment
    /// rather than the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("RAGCHAT_CORPUS_PATH") {
            self.corpus_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("RAGCHAT_INDEX_PATH") {
            self.index_path = PathBuf::from(path);
        }
        if let Ok(endpoint) = env::var("RAGCHAT_LLM_ENDPOINT") {
            self.llm.endpoint = Some(endpoint);
        }
        if let Ok(model) = env::var("RAGCHAT_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(key) = env::var("RAGCHAT_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(endpoint) = env::var("RAGCHAT_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(endpoint);
        }
        if let Ok(key) = env::var("RAGCHAT_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(key);
        }
    }

    /// Reject configurations the pipeline cannot honor
    pub fn validate(&self) -> ChatResult<()> {
        if self.chunk_size == 0 {
            return Err(ChatError::Config("chunk_size must be > 0".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ChatError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.retrieval_k == 0 {
            return Err(ChatError::Config("retrieval_k must be > 0".to_string()));
        }
        if self.embedding_dimension == 0 {
            return Err(ChatError::Config(
                "embedding_dimension must be > 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ChatError::Config(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.fallback_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ChatError::Config(
                "fallback_markers must not contain empty phrases".to_string(),
            ));
        }
        Ok(())
    }
}
