//! Core types for document ingestion and chunking.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A unit of ingested text.
///
/// Documents exist only during indexing: they are read from disk, split into
/// [`Chunk`]s, and discarded. Only chunks are embedded and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Raw text content.
    pub content: String,

    /// Path relative to the indexed root, used for citation.
    pub source: PathBuf,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// A contiguous piece of a document, the unit of embedding and storage.
///
/// Chunk content is never trimmed: concatenating a document's chunks (minus
/// overlap) reconstructs the document text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text content of this chunk.
    pub content: String,

    /// Source path inherited from the parent document.
    pub source: PathBuf,
}

impl Chunk {
    pub fn new(content: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }

    /// Length of the content in characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// First `max_chars` of the content, cut at a UTF-8 boundary.
    pub fn preview(&self, max_chars: usize) -> &str {
        if self.content.len() <= max_chars {
            return &self.content;
        }
        let mut end = max_chars;
        while end > 0 && !self.content.is_char_boundary(end) {
            end -= 1;
        }
        &self.content[..end]
    }
}
