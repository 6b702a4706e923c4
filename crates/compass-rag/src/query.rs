//! Question answering: credential check -> retrieval -> generation

use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::AnswerGenerator;
use crate::providers::{self, EmbeddingProvider, LlmProvider};
use crate::retrieval::{Retriever, VectorStore};
use crate::types::Answer;

/// Answers questions against a built vector store
pub struct QueryPipeline {
    retriever: Retriever,
    generator: AnswerGenerator,
}

impl QueryPipeline {
    pub fn new(retriever: Retriever, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Build the pipeline with the providers named in `config`
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let embedder = providers::embedder_from_config(&config.embeddings)?;
        let llm = providers::llm_from_config(&config.llm)?;
        Ok(Self::with_providers(config, embedder, llm))
    }

    /// Build the pipeline around already constructed providers
    pub fn with_providers(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let store = Arc::new(VectorStore::from_config(&config.vector_store));
        Self::new(
            Retriever::new(store, embedder).with_top_k(config.retrieval.top_k),
            AnswerGenerator::new(llm),
        )
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Fail with `Error::Credential` when the LLM key is missing
    pub fn ensure_credentials(&self) -> Result<()> {
        self.generator.ensure_credentials()
    }

    /// Whether the LLM credential is present
    pub fn credentials_available(&self) -> bool {
        self.ensure_credentials().is_ok()
    }

    /// Answer using the configured number of chunks
    pub async fn answer_question(&self, question: &str) -> Result<Answer> {
        self.answer_question_top(question, self.retriever.top_k()).await
    }

    /// Answer using the `k` closest chunks
    pub async fn answer_question_top(&self, question: &str, k: usize) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("Question must not be empty".to_string()));
        }
        if k == 0 {
            return Err(Error::InvalidInput("top_k must be at least 1".to_string()));
        }

        // Fail before any embedding or network work
        self.ensure_credentials()?;

        let start = Instant::now();
        tracing::info!("Answering question (k = {}): {}", k, question);

        let retrieval = self.retriever.retrieve_top(question, k).await?;
        let answer = self.generator.generate(question, retrieval).await?;

        tracing::info!(
            "Answered from {} chunks in {}ms",
            answer.sources.len(),
            start.elapsed().as_millis()
        );
        Ok(answer)
    }
}
