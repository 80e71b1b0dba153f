//! Error types shared across the crate.
//!
//! One taxonomy covers the whole pipeline. Configuration and credential
//! problems are fatal at startup; index lifecycle errors carry the guidance
//! needed to recover; upstream model failures are propagated without retry.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(
        "missing API credential. Set RAGLINE_API_KEY (or OPENAI_API_KEY), or api_key in .ragline/settings.toml"
    )]
    MissingCredential,

    #[error("cannot build an index from zero chunks")]
    EmptyIndex,

    #[error("index not found at {path}. Run `ragline index <DIR>` to build one")]
    IndexNotFound { path: PathBuf },

    #[error("index at {path} failed integrity checks ({reason}). Run `ragline index <DIR>` to rebuild")]
    CorruptIndex { path: PathBuf, reason: String },

    #[error(
        "embedding dimension mismatch: index was built with {expected}, got {actual}. \
         The embedding model has likely changed; rebuild the index with `ragline index <DIR>`"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("upstream model call failed: {0}")]
    UpstreamModel(String),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RagError>;
