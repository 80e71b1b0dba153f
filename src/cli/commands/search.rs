//! Search command - retrieval without generation.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::model::openai::OpenAiEmbeddings;
use crate::retrieve::Retriever;
use crate::vector::VectorIndex;

/// Characters of chunk content shown per result in text output.
const PREVIEW_CHARS: usize = 200;

pub async fn run(
    settings: &Settings,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let index = VectorIndex::load(&settings.index_file())?;

    let embedder = Arc::new(OpenAiEmbeddings::from_settings(settings)?);
    let retriever = Retriever::new(embedder);

    let k = limit.unwrap_or(settings.retrieval.top_k);
    let results = retriever.retrieve(query, k, &index).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results).unwrap_or_default());
        return Ok(());
    }

    if results.is_empty() {
        eprintln!("No results found.");
        return Ok(());
    }

    for result in &results {
        println!(
            "\n{}. {} (score: {:.3})",
            result.rank,
            result.chunk.source.display(),
            result.score
        );
        println!("   {}", result.chunk.preview(PREVIEW_CHARS).trim_end());
    }

    Ok(())
}
