//! Recursive character chunking.
//!
//! Splits document text at the largest separator that produces pieces within
//! the size budget, trying paragraph breaks first, then line breaks, then
//! spaces, then plain character boundaries. Separators stay attached to the
//! preceding piece, so concatenating the output (minus overlap) reconstructs
//! the input exactly.

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::documents::types::{Chunk, Document};
use crate::error::Result;

/// Separators in priority order. Character boundaries are the implicit
/// final fallback.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splits text into chunks of at most `chunk_size` characters, with up to
/// `chunk_overlap` trailing characters of each chunk carried into the next.
///
/// Overlap is applied at piece granularity: the tail pieces of the previous
/// chunk are retained as long as they fit the overlap budget, so the actual
/// shared region may be shorter than `chunk_overlap`.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a chunker, validating `chunk_size > 0` and
    /// `chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let config = ChunkingConfig {
            chunk_size,
            chunk_overlap,
        };
        Self::from_config(&config)
    }

    /// Create a chunker from validated configuration.
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    /// Split documents into chunks, propagating each document's source path.
    ///
    /// Chunk order follows text order within each document, and documents
    /// keep their input order. Deterministic; no I/O.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .map(|content| Chunk::new(content, doc.source.clone()))
            })
            .collect()
    }

    /// Split raw text into overlapping chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut atoms = Vec::new();
        self.split_level(text, 0, &mut atoms);
        self.merge_atoms(atoms)
    }

    /// Recursively split `text` into pieces of at most `chunk_size` chars,
    /// descending through the separator priority list.
    fn split_level(&self, text: &str, level: usize, out: &mut Vec<String>) {
        if text.is_empty() {
            return;
        }
        if text.chars().count() <= self.chunk_size {
            out.push(text.to_string());
            return;
        }
        if level >= SEPARATORS.len() {
            // No smaller separator left: fall back to character boundaries.
            split_chars(text, self.chunk_size, out);
            return;
        }

        for piece in text.split_inclusive(SEPARATORS[level]) {
            if piece.chars().count() <= self.chunk_size {
                out.push(piece.to_string());
            } else {
                self.split_level(piece, level + 1, out);
            }
        }
    }

    /// Greedily pack pieces into chunks, keeping a tail window of at most
    /// `chunk_overlap` characters as the start of the next chunk.
    fn merge_atoms(&self, atoms: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(String, usize)> = VecDeque::new();
        let mut total = 0usize;

        for atom in atoms {
            let len = atom.chars().count();

            if total + len > self.chunk_size && !window.is_empty() {
                chunks.push(join_window(&window));

                // Shrink the window until it fits the overlap budget and
                // leaves room for the incoming piece.
                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some((_, popped)) => total -= popped,
                        None => break,
                    }
                }
            }

            total += len;
            window.push_back((atom, len));
        }

        if !window.is_empty() {
            chunks.push(join_window(&window));
        }

        chunks
    }
}

fn join_window(window: &VecDeque<(String, usize)>) -> String {
    window.iter().map(|(atom, _)| atom.as_str()).collect()
}

/// Split `text` into pieces of exactly `max_chars` characters (last piece
/// may be shorter), respecting UTF-8 boundaries.
fn split_chars(text: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            out.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_text() {
        let chunker = RecursiveChunker::new(100, 10).unwrap();
        assert!(chunker.split_text("").is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(RecursiveChunker::new(0, 0).is_err());
        assert!(RecursiveChunker::new(100, 100).is_err());
        assert!(RecursiveChunker::new(100, 150).is_err());
        assert!(RecursiveChunker::new(100, 99).is_ok());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = RecursiveChunker::new(100, 10).unwrap();
        let chunks = chunker.split_text("A short paragraph.");
        assert_eq!(chunks, vec!["A short paragraph.".to_string()]);
    }

    #[test]
    fn test_paragraphs_split_first() {
        let chunker = RecursiveChunker::new(40, 5).unwrap();
        let text = "Paris is the capital of France.\n\nBerlin is the capital of Germany.";
        let chunks = chunker.split_text(text);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("Paris"));
        assert!(chunks[1].starts_with("Berlin"));
    }

    #[test]
    fn test_no_chunk_exceeds_size() {
        let chunker = RecursiveChunker::new(50, 10).unwrap();
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let chunks = chunker.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                chunk.chars().count() <= 50,
                "chunk of {} chars exceeds limit: {chunk:?}",
                chunk.chars().count()
            );
        }
    }

    #[test]
    fn test_long_word_falls_back_to_chars() {
        let chunker = RecursiveChunker::new(10, 2).unwrap();
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunker.split_text(text);

        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
        // Character fallback is lossless
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let chunker = RecursiveChunker::new(4, 1).unwrap();
        let text = "héllo wörld ünïcode";
        let chunks = chunker.split_text(text);

        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4);
        }
    }

    #[test]
    fn test_coverage_without_overlap() {
        // With zero overlap, concatenating chunks reconstructs the input.
        let chunker = RecursiveChunker::new(30, 0).unwrap();
        let text = "First sentence here.\n\nSecond sentence follows.\nThird line ends it.";
        let chunks = chunker.split_text(text);

        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_overlap_carried_between_chunks() {
        let chunker = RecursiveChunker::new(40, 15).unwrap();
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let chunks = chunker.split_text(text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            // The next chunk starts with some suffix of the previous one.
            let prev = &pair[0];
            let next = &pair[1];
            let shared: usize = (1..=prev.len().min(next.len()))
                .rev()
                .find(|&n| prev.is_char_boundary(prev.len() - n) && next.is_char_boundary(n)
                    && prev[prev.len() - n..] == next[..n])
                .unwrap_or(0);
            assert!(shared > 0, "no overlap between {prev:?} and {next:?}");
            assert!(shared <= 15, "overlap {shared} exceeds budget");
        }
    }

    #[test]
    fn test_coverage_reconstruction_with_overlap() {
        let chunker = RecursiveChunker::new(40, 15).unwrap();
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let chunks = chunker.split_text(text);
        assert!(chunks.len() > 1);

        // Strip each chunk's leading overlap (the longest suffix of the
        // previous chunk that prefixes it), then concatenate.
        let mut rebuilt = chunks[0].clone();
        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let shared = (0..=prev.len().min(next.len()))
                .rev()
                .find(|&n| next.is_char_boundary(n) && prev.ends_with(&next[..n]))
                .unwrap_or(0);
            rebuilt.push_str(&next[shared..]);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_deterministic() {
        let chunker = RecursiveChunker::new(50, 10).unwrap();
        let text = "Alpha beta gamma.\n\nDelta epsilon zeta eta theta iota kappa lambda mu.";
        assert_eq!(chunker.split_text(text), chunker.split_text(text));
    }

    #[test]
    fn test_split_documents_propagates_source() {
        let chunker = RecursiveChunker::new(40, 5).unwrap();
        let docs = vec![
            Document::new(
                "Paris is the capital of France.\n\nBerlin is the capital of Germany.",
                "docs/capitals.txt",
            ),
            Document::new("A tiny document.", "docs/tiny.txt"),
        ];

        let chunks = chunker.split_documents(&docs);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].source, PathBuf::from("docs/capitals.txt"));
        assert_eq!(chunks[1].source, PathBuf::from("docs/capitals.txt"));
        assert_eq!(chunks[2].source, PathBuf::from("docs/tiny.txt"));
    }
}
