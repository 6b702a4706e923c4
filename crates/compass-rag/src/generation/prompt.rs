//! Prompt templates for RAG generation

use crate::types::RetrievalResult;

/// Separator placed between retrieved chunks in the context block
pub const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Chunk texts in rank order, joined by [`CONTEXT_DELIMITER`]
    pub fn build_context(retrieval: &RetrievalResult) -> String {
        retrieval
            .iter()
            .map(|m| m.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER)
    }

    /// Build the grounded question-answering prompt
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            r#"
Answer the user's question based ONLY on the following context.
If you cannot find the answer in the context, clearly state that you don't know,
and DO NOT make up an answer.

Context:
{context}

---

Question: {question}
"#,
            context = context,
            question = question
        )
    }
}
