// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Corpus loading and chunking
//!
//! Splits the knowledge-base document into overlapping character windows.
//! Each chunk after the first starts `chunk_overlap` characters before the
//! previous chunk's end, so local context survives chunk boundaries. The
//! split is deterministic: the same document and parameters always produce
//! the same chunk sequence.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ChatError, ChatResult};

/// A bounded contiguous span of the source corpus used as a retrieval unit.
/// `source_offset` is the chunk's starting position in the document, in
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source_offset: usize,
}

/// Read the knowledge-base document. Unreadable corpus is fatal at startup.
pub fn load_corpus(path: &Path) -> ChatResult<String> {
    let text = std::fs::read_to_string(path).map_err(|source| ChatError::CorpusLoad {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), chars = text.chars().count(), "Loaded corpus");
    Ok(text)
}

/// Split a document into overlapping chunks.
///
/// Offsets and lengths are measured in Unicode scalar values, not bytes, so
/// a chunk boundary never splits a character. The final chunk may be shorter
/// than `chunk_size`. Callers guarantee `chunk_overlap < chunk_size` (config
/// validation).
pub fn chunk_document(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<Chunk> {
    debug_assert!(chunk_size > 0 && chunk_overlap < chunk_size);

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = chunk_size - chunk_overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(Chunk {
            text: chars[start..end].iter().collect(),
            source_offset: start,
        });
        if end == chars.len() {
            break;
        }
        start += step;
    }

    tracing::debug!(
        chunks = chunks.len(),
        chunk_size,
        chunk_overlap,
        "Chunked document"
    );
    chunks
}
