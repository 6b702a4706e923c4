//! Provider abstractions for embeddings and LLM completion
//!
//! Trait-based so the pipelines can switch between local (Ollama, hashing)
//! and hosted (Gemini) backends through configuration.

pub mod embedding;
pub mod gemini;
pub mod hashing;
pub mod llm;
pub mod ollama;

use std::sync::Arc;

use crate::config::{EmbeddingBackend, EmbeddingConfig, LlmBackend, LlmConfig};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use hashing::{HashingEmbedder, HASHING_MODEL};
pub use llm::LlmProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};

/// Build the configured embedding provider
pub fn embedder_from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedder: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(config)?),
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.dimensions)),
    };
    tracing::info!(
        "Embedding provider: {} ({}, {} dims)",
        embedder.name(),
        embedder.model(),
        embedder.dimensions()
    );
    Ok(embedder)
}

/// Build the configured LLM provider
pub fn llm_from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let llm: Arc<dyn LlmProvider> = match config.provider {
        LlmBackend::Gemini => Arc::new(GeminiClient::from_config(config)?),
        LlmBackend::Ollama => Arc::new(OllamaLlm::new(config)?),
    };
    tracing::info!("LLM provider: {} ({})", llm.name(), llm.model());
    Ok(llm)
}
