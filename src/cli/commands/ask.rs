//! Ask command - full retrieval-augmented answer.

use std::sync::Arc;

use crate::answer::Answerer;
use crate::config::Settings;
use crate::error::Result;
use crate::model::openai::{OpenAiChat, OpenAiEmbeddings};
use crate::vector::VectorIndex;

pub async fn run(settings: &Settings, question: &str, top_k: Option<usize>) -> Result<()> {
    let index = VectorIndex::load(&settings.index_file())?;

    let embedder = Arc::new(OpenAiEmbeddings::from_settings(settings)?);
    let chat = Arc::new(OpenAiChat::from_settings(settings)?);
    let answerer = Answerer::new(embedder, chat, top_k.unwrap_or(settings.retrieval.top_k));

    let answer = answerer.answer(question, &index).await?;

    println!("\n=== Answer ===\n");
    println!("{}", answer.text);
    println!("\n=== Sources ===");
    for source in &answer.sources {
        println!("- {source}");
    }

    Ok(())
}
