//! Embeds questions and fetches the closest stored chunks

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::RetrievalResult;

use super::store::VectorStore;

/// Number of chunks retrieved per question unless overridden
pub const DEFAULT_TOP_K: usize = 3;

/// Top-k semantic retriever over a [`VectorStore`]
pub struct Retriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Retrieve the default number of chunks for `question`
    pub async fn retrieve(&self, question: &str) -> Result<RetrievalResult> {
        self.retrieve_top(question, self.top_k).await
    }

    /// Retrieve up to `k` chunks for `question`, best first
    pub async fn retrieve_top(&self, question: &str, k: usize) -> Result<RetrievalResult> {
        let store = Arc::clone(&self.store);
        let manifest = tokio::task::spawn_blocking(move || store.manifest())
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        if manifest.record_count == 0 {
            return Err(Error::EmptyStore {
                path: self.store.path().to_path_buf(),
            });
        }
        if manifest.embedding_model != self.embedder.model() {
            return Err(Error::ModelMismatch {
                expected: manifest.embedding_model,
                found: self.embedder.model().to_string(),
            });
        }

        let query = self.embedder.embed(question).await?;

        let store = Arc::clone(&self.store);
        let matches = tokio::task::spawn_blocking(move || store.search(&query, k))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        tracing::debug!("Retrieved {} chunks (k = {})", matches.len(), k);
        Ok(RetrievalResult::new(matches))
    }
}
