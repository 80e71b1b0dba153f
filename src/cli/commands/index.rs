//! Index command - build the vector store from a document directory.

use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::indexing::Indexer;
use crate::model::openai::OpenAiEmbeddings;

pub async fn run(settings: &Settings, doc_root: &Path, no_progress: bool) -> Result<()> {
    let embedder = Arc::new(OpenAiEmbeddings::from_settings(settings)?);

    let mut indexer = Indexer::new(settings, embedder)?;
    if no_progress {
        indexer = indexer.with_progress(false);
    }

    let report = indexer.run(doc_root).await?;

    if report.files_read == 0 {
        println!(
            "No documents found in {}. Add .txt or .md files and re-run.",
            doc_root.display()
        );
        return Ok(());
    }

    if report.chunks_written == 0 {
        println!(
            "Read {} files but none produced chunks; store not written.",
            report.files_read
        );
        return Ok(());
    }

    println!(
        "Indexed {} files into {} chunks.",
        report.files_read, report.chunks_written
    );
    println!("Store saved to: {}", settings.index_file().display());
    Ok(())
}
