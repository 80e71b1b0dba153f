//! On-disk layout and atomic save/load for the vector index.
//!
//! The store is a single JSON document: a small header (format version,
//! metric, dimension) followed by the chunk table and the vector rows.
//! Enough is recorded to reject queries from a different embedding model.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::documents::Chunk;
use crate::error::{RagError, Result};
use crate::vector::{SimilarityMetric, VectorIndex};

/// Bumped whenever the stored layout changes incompatibly.
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    metric: SimilarityMetric,
    dimension: usize,
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

/// Write the index to `path` atomically: serialize into a temp file in the
/// same directory, then rename over the target.
pub fn save(index: &VectorIndex, path: &Path) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        std::fs::create_dir_all(parent).map_err(|e| RagError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let dir = parent.unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir).map_err(|e| RagError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file = IndexFile {
        version: FORMAT_VERSION,
        metric: index.metric(),
        dimension: index.dimension(),
        chunks: index.chunks().to_vec(),
        vectors: index.vectors().to_vec(),
    };

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, &file).map_err(|e| RagError::FileWrite {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        writer.flush().map_err(|e| RagError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    tmp.persist(path).map_err(|e| RagError::FileWrite {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    debug!(target: "vector", path = %path.display(), entries = index.len(), "index saved");
    Ok(())
}

/// Load and validate a persisted index.
pub fn load(path: &Path) -> Result<VectorIndex> {
    if !path.exists() {
        return Err(RagError::IndexNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| RagError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let stored: IndexFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| RagError::CorruptIndex {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    validate(&stored).map_err(|reason| RagError::CorruptIndex {
        path: path.to_path_buf(),
        reason,
    })?;

    debug!(target: "vector", path = %path.display(), entries = stored.chunks.len(), "index loaded");
    Ok(VectorIndex::from_parts(
        stored.metric,
        stored.dimension,
        stored.chunks,
        stored.vectors,
    ))
}

/// Integrity checks applied after deserialization.
fn validate(stored: &IndexFile) -> std::result::Result<(), String> {
    if stored.version != FORMAT_VERSION {
        return Err(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            stored.version
        ));
    }
    if stored.dimension == 0 {
        return Err("stored dimension is zero".to_string());
    }
    if stored.chunks.is_empty() {
        return Err("store contains no chunks".to_string());
    }
    if stored.chunks.len() != stored.vectors.len() {
        return Err(format!(
            "{} chunks but {} vectors",
            stored.chunks.len(),
            stored.vectors.len()
        ));
    }
    for (i, vector) in stored.vectors.iter().enumerate() {
        if vector.len() != stored.dimension {
            return Err(format!(
                "vector {i} has dimension {} (expected {})",
                vector.len(),
                stored.dimension
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_index() -> VectorIndex {
        let chunks = vec![
            Chunk::new("first chunk", "a.txt"),
            Chunk::new("second chunk", "b.txt"),
        ];
        let vectors = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
        VectorIndex::build(chunks, vectors).unwrap()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let index = sample_index();
        index.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.dimension(), index.dimension());
        assert_eq!(loaded.metric(), index.metric());

        // Search results are identical pre- and post-save
        let query = vec![0.7, 0.3, 0.0];
        let before = index.search(&query, 2).unwrap();
        let after = loaded.search(&query, 2).unwrap();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.chunk, a.chunk);
            assert_eq!(b.score, a.score);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::IndexNotFound { .. }));
    }

    #[test]
    fn test_load_unparseable_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "not json at all").unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex { .. }));
    }

    #[test]
    fn test_load_rejects_count_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let broken = serde_json::json!({
            "version": 1,
            "metric": "cosine",
            "dimension": 2,
            "chunks": [{"content": "a", "source": "a.txt"}],
            "vectors": [[1.0, 0.0], [0.0, 1.0]],
        });
        std::fs::write(&path, broken.to_string()).unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex { .. }));
    }

    #[test]
    fn test_load_rejects_dimension_inconsistency() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let broken = serde_json::json!({
            "version": 1,
            "metric": "cosine",
            "dimension": 3,
            "chunks": [{"content": "a", "source": "a.txt"}],
            "vectors": [[1.0, 0.0]],
        });
        std::fs::write(&path, broken.to_string()).unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex { .. }));
    }

    #[test]
    fn test_load_rejects_future_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let broken = serde_json::json!({
            "version": 99,
            "metric": "cosine",
            "dimension": 1,
            "chunks": [{"content": "a", "source": "a.txt"}],
            "vectors": [[1.0]],
        });
        std::fs::write(&path, broken.to_string()).unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex { .. }));
    }

    #[test]
    fn test_save_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        sample_index().save(&path).unwrap();

        let replacement = VectorIndex::build(
            vec![Chunk::new("only", "c.txt")],
            vec![vec![0.5, 0.5, 0.0]],
        )
        .unwrap();
        replacement.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.chunks()[0].content, "only");
    }
}
