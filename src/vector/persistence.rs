// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Index persistence
//!
//! The index is written as bincode behind a small versioned header, so a
//! stale or foreign file fails loudly instead of deserializing into
//! garbage. A saved-then-loaded index yields byte-identical entries and
//! therefore identical search results.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::VectorIndex;
use crate::errors::{ChatError, ChatResult};

const INDEX_MAGIC: [u8; 4] = *b"RGCX";
const INDEX_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    magic: [u8; 4],
    version: u32,
    index: VectorIndex,
}

impl VectorIndex {
    /// Persist the index to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> ChatResult<()> {
        let persisted = PersistedIndex {
            magic: INDEX_MAGIC,
            version: INDEX_VERSION,
            index: self.clone(),
        };

        let bytes = bincode::serialize(&persisted).map_err(|e| ChatError::IndexPersistence {
            path: path.to_path_buf(),
            reason: format!("serialization failed: {}", e),
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ChatError::IndexPersistence {
                    path: path.to_path_buf(),
                    reason: format!("cannot create directory: {}", e),
                })?;
            }
        }

        std::fs::write(path, bytes).map_err(|e| ChatError::IndexPersistence {
            path: path.to_path_buf(),
            reason: format!("write failed: {}", e),
        })?;

        tracing::info!(path = %path.display(), chunks = self.len(), "Saved vector index");
        Ok(())
    }

    /// Load a previously persisted index; the result is a drop-in
    /// replacement for the freshly built original
    pub fn load(path: &Path) -> ChatResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| ChatError::IndexPersistence {
            path: path.to_path_buf(),
            reason: format!("read failed: {}", e),
        })?;

        let persisted: PersistedIndex =
            bincode::deserialize(&bytes).map_err(|e| ChatError::IndexPersistence {
                path: path.to_path_buf(),
                reason: format!("deserialization failed: {}", e),
            })?;

        if persisted.magic != INDEX_MAGIC {
            return Err(ChatError::IndexPersistence {
                path: path.to_path_buf(),
                reason: "not a vector index file".to_string(),
            });
        }
        if persisted.version != INDEX_VERSION {
            return Err(ChatError::IndexPersistence {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported index version {} (expected {})",
                    persisted.version, INDEX_VERSION
                ),
            });
        }

        tracing::info!(
            path = %path.display(),
            chunks = persisted.index.len(),
            "Loaded vector index"
        );
        Ok(persisted.index)
    }
}
