//! Grounded answer generation over retrieved chunks

use std::sync::Arc;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::types::{Answer, RetrievalResult};

use super::prompt::PromptBuilder;

/// Answers are generated deterministically
pub const GENERATION_TEMPERATURE: f32 = 0.0;

/// Turns a question plus retrieved context into an [`Answer`]
pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Fails with a credential error when the LLM cannot authenticate
    pub fn ensure_credentials(&self) -> Result<()> {
        self.llm.ensure_credentials()
    }

    /// Generate an answer from `retrieval`. No retries.
    pub async fn generate(&self, question: &str, retrieval: RetrievalResult) -> Result<Answer> {
        self.ensure_credentials()?;

        let context = PromptBuilder::build_context(&retrieval);
        let prompt = PromptBuilder::build_rag_prompt(question, &context);
        tracing::debug!(
            "Prompt built from {} chunks ({} chars)",
            retrieval.len(),
            prompt.len()
        );

        let text = self.llm.complete(&prompt, GENERATION_TEMPERATURE).await?;
        Ok(Answer::new(text, retrieval))
    }
}
