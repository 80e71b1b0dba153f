//! Prompt construction for grounded answering.

/// Instruction constraining the model to the supplied context.
pub const SYSTEM_PROMPT: &str = "You are a helpful domain assistant. \
Answer using ONLY the provided context. \
If the answer is not in the context, respond with: 'I don't have enough information from the provided documents.' \
Be concise and cite the sources list by filename when relevant.";

/// The exact sentence the model is instructed to emit when the context does
/// not contain the answer.
pub const FALLBACK_ANSWER: &str =
    "I don't have enough information from the provided documents.";

/// Build the full grounding prompt from assembled context and a question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\n\
         Answer (keep factual, grounded, and concise):"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = build_prompt("[1] Source: a.txt\nSome fact.\n", "What fact?");
        assert!(prompt.contains("Some fact."));
        assert!(prompt.contains("Question: What fact?"));
        assert!(prompt.starts_with(SYSTEM_PROMPT));
    }

    #[test]
    fn test_system_prompt_names_fallback() {
        assert!(SYSTEM_PROMPT.contains(FALLBACK_ANSWER));
    }
}
