//! Corpus traversal for discovering plain-text files to ingest.
//!
//! Walks a directory tree respecting .gitignore rules and a custom
//! `.raglineignore` file, skipping hidden files, and returning entries in a
//! deterministic order.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::documents::Document;
use crate::error::{RagError, Result};

/// File extensions treated as plain text.
const TEXT_EXTENSIONS: [&str; 4] = ["txt", "md", "markdown", "text"];

/// Walks a corpus directory and reads eligible files as documents.
#[derive(Debug, Default)]
pub struct CorpusWalker;

impl CorpusWalker {
    pub fn new() -> Self {
        Self
    }

    /// Walk `root` and return eligible file paths in deterministic order.
    pub fn walk(&self, root: &Path) -> impl Iterator<Item = PathBuf> {
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .max_depth(None)
            .require_git(false)
            .add_custom_ignore_filename(".raglineignore")
            .sort_by_file_name(|a, b| a.cmp(b));

        builder
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(|entry| {
                let path = entry.path();

                // Skip hidden files
                if path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'))
                {
                    return None;
                }

                let extension = path.extension().and_then(|e| e.to_str())?;
                if TEXT_EXTENSIONS
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(extension))
                {
                    Some(path.to_path_buf())
                } else {
                    None
                }
            })
    }

    /// Read every eligible file under `root` as a [`Document`].
    ///
    /// Content is decoded as UTF-8 with undecodable bytes replaced rather
    /// than failing the run. The document source is the path relative to
    /// `root`.
    pub fn read_documents(&self, root: &Path) -> Result<Vec<Document>> {
        let mut documents = Vec::new();

        for path in self.walk(root) {
            let bytes = std::fs::read(&path).map_err(|e| RagError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            let content = String::from_utf8_lossy(&bytes).into_owned();

            let source = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            documents.push(Document::new(content, source));
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("notes.txt"), "text").unwrap();
        fs::write(root.join("guide.md"), "markdown").unwrap();
        fs::write(root.join("image.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("script.py"), "print()").unwrap();

        let files: Vec<_> = CorpusWalker::new().walk(root).collect();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("notes.txt")));
        assert!(files.iter().any(|p| p.ends_with("guide.md")));
    }

    #[test]
    fn test_walk_recurses_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("top.txt"), "top").unwrap();
        fs::write(root.join("a/b/deep.txt"), "deep").unwrap();

        let files: Vec<_> = CorpusWalker::new().walk(root).collect();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_walk_skips_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join(".hidden.txt"), "hidden").unwrap();
        fs::write(root.join("visible.txt"), "visible").unwrap();

        let files: Vec<_> = CorpusWalker::new().walk(root).collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("visible.txt"));
    }

    #[test]
    fn test_read_documents_relative_source() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/doc.txt"), "content here").unwrap();

        let documents = CorpusWalker::new().read_documents(root).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].source, PathBuf::from("sub/doc.txt"));
        assert_eq!(documents[0].content, "content here");
    }

    #[test]
    fn test_read_documents_tolerates_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("mixed.txt"), [b'o', b'k', 0xFF, b'!']).unwrap();

        let documents = CorpusWalker::new().read_documents(root).unwrap();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].content.starts_with("ok"));
        assert!(documents[0].content.ends_with('!'));
    }

    #[test]
    fn test_deterministic_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(root.join(name), name).unwrap();
        }

        let first: Vec<_> = CorpusWalker::new().walk(root).collect();
        let second: Vec<_> = CorpusWalker::new().walk(root).collect();
        assert_eq!(first, second);
        assert!(first[0].ends_with("a.txt"));
        assert!(first[2].ends_with("c.txt"));
    }
}
