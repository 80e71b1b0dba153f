pub mod answer;
pub mod cli;
pub mod config;
pub mod documents;
pub mod error;
pub mod indexing;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod prompt;
pub mod retrieve;
pub mod vector;

pub use answer::{Answer, Answerer};
pub use config::Settings;
pub use documents::{Chunk, Document, RecursiveChunker};
pub use error::{RagError, Result};
pub use indexing::{IndexBuildReport, Indexer};
pub use retrieve::{RetrievedChunk, Retriever, assemble_context};
pub use vector::{SimilarityMetric, VectorIndex};
