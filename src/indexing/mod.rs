//! Index construction: read documents, chunk, embed, build, persist.
//!
//! One [`Indexer::run`] is a full rebuild. Any existing store at the target
//! path is overwritten; there is no incremental merge.

pub mod walker;

pub use walker::CorpusWalker;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use tracing::info;

use crate::config::Settings;
use crate::documents::RecursiveChunker;
use crate::error::Result;
use crate::model::EmbeddingProvider;
use crate::vector::VectorIndex;

/// Chunks sent to the embedding provider per request.
const EMBED_BATCH_SIZE: usize = 64;

/// Outcome of one indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBuildReport {
    /// Number of eligible files read from the corpus.
    pub files_read: usize,

    /// Number of chunks embedded and written to the store.
    pub chunks_written: usize,
}

/// Orchestrates the offline half of the pipeline.
pub struct Indexer {
    chunker: RecursiveChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index_file: PathBuf,
    show_progress: bool,
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("chunker", &self.chunker)
            .field("index_file", &self.index_file)
            .field("show_progress", &self.show_progress)
            .finish_non_exhaustive()
    }
}

impl Indexer {
    /// Create an indexer from settings and an embedding provider.
    ///
    /// Chunking parameters are validated here, so an invalid configuration
    /// fails before any file is read.
    pub fn new(settings: &Settings, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let chunker = RecursiveChunker::from_config(&settings.chunking)?;
        Ok(Self {
            chunker,
            embedder,
            index_file: settings.index_file(),
            show_progress: std::io::stderr().is_terminal(),
        })
    }

    /// Override progress bar display (on by default when stderr is a tty).
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Build and persist the index for every eligible file under `doc_root`.
    ///
    /// An empty corpus is a valid state: the report comes back as zeros and
    /// nothing is written.
    pub async fn run(&self, doc_root: &Path) -> Result<IndexBuildReport> {
        let documents = CorpusWalker::new().read_documents(doc_root)?;
        let files_read = documents.len();

        if documents.is_empty() {
            info!(target: "indexing", root = %doc_root.display(), "no eligible files found");
            return Ok(IndexBuildReport {
                files_read: 0,
                chunks_written: 0,
            });
        }

        let chunks = self.chunker.split_documents(&documents);
        drop(documents);

        if chunks.is_empty() {
            info!(target: "indexing", files_read, "corpus produced no chunks");
            return Ok(IndexBuildReport {
                files_read,
                chunks_written: 0,
            });
        }

        let vectors = self.embed_chunks(&chunks).await?;

        let chunks_written = chunks.len();
        let index = VectorIndex::build(chunks, vectors)?;
        index.save(&self.index_file)?;

        info!(
            target: "indexing",
            files_read,
            chunks_written,
            path = %self.index_file.display(),
            "index built"
        );

        Ok(IndexBuildReport {
            files_read,
            chunks_written,
        })
    }

    /// Request embeddings in fixed-size batches, preserving chunk order.
    async fn embed_chunks(&self, chunks: &[crate::documents::Chunk]) -> Result<Vec<Vec<f32>>> {
        let progress = if self.show_progress {
            let bar = ProgressBar::new(chunks.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} chunks embedded")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        } else {
            None
        };

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            vectors.extend(self.embedder.embed_batch(&texts).await?);

            if let Some(bar) = &progress {
                bar.inc(batch.len() as u64);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        Ok(vectors)
    }
}
