//! Document ingestion and chunking.
//!
//! Documents are read from a corpus directory, split into overlapping
//! chunks, and handed to the embedding provider. Only chunks survive past
//! indexing; the source path travels with each chunk for citation.

pub mod chunker;
pub mod types;

pub use chunker::RecursiveChunker;
pub use types::{Chunk, Document};
