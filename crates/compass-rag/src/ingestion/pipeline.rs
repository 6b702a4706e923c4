//! Ingestion pipeline orchestration: load -> chunk -> embed -> rebuild store

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::VectorStore;
use crate::types::StoredRecord;

use super::chunker::TextChunker;
use super::loader::{DocumentLoader, PdfDirectoryLoader};

/// Ingestion stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngestState {
    Idle,
    Loading,
    Chunking,
    EmbeddingAndPersisting,
    Done,
    Failed,
}

impl IngestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Progress notifications emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    StateChanged(IngestState),
    DocumentsLoaded(usize),
    ChunksCreated(usize),
    Embedded { done: usize, total: usize },
}

/// Summary of a successful rebuild
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Pages loaded
    pub documents: usize,
    /// Chunks created
    pub chunks: usize,
    /// Records persisted in the rebuilt store
    pub records: usize,
    /// Where the store was written
    pub store_path: PathBuf,
    pub duration_ms: u64,
}

/// Main ingestion pipeline
pub struct IngestionPipeline {
    loader: Arc<dyn DocumentLoader>,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<VectorStore>,
    batch_size: usize,
    state: Mutex<IngestState>,
}

impl IngestionPipeline {
    /// Create a pipeline from explicit parts
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        chunker: TextChunker,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<VectorStore>,
    ) -> Self {
        Self {
            loader,
            chunker,
            embedder,
            store,
            batch_size: 16,
            state: Mutex::new(IngestState::Idle),
        }
    }

    /// Create a pipeline reading PDFs from the configured directory
    pub fn from_config(config: &RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::new(
            Arc::new(PdfDirectoryLoader::from_config(&config.documents)),
            TextChunker::from_config(&config.chunking),
            embedder,
            Arc::new(VectorStore::from_config(&config.vector_store)),
        )
        .with_batch_size(config.embeddings.batch_size)
    }

    /// Number of chunks embedded between progress events
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn state(&self) -> IngestState {
        *self.state.lock()
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Rebuild the store from scratch
    pub async fn run(&self) -> Result<IngestReport> {
        self.run_with_progress(|_| {}).await
    }

    /// Rebuild the store, reporting progress to `progress`
    pub async fn run_with_progress<F>(&self, progress: F) -> Result<IngestReport>
    where
        F: Fn(IngestEvent) + Send + Sync,
    {
        let result = self.execute(&progress).await;

        match &result {
            Ok(report) => {
                self.transition(IngestState::Done, &progress);
                tracing::info!(
                    "Ingestion complete: {} pages, {} chunks, {} records in {}ms",
                    report.documents,
                    report.chunks,
                    report.records,
                    report.duration_ms
                );
            }
            Err(e) => {
                self.transition(IngestState::Failed, &progress);
                tracing::error!("Ingestion failed: {}", e);
            }
        }

        result
    }

    async fn execute<F>(&self, progress: &F) -> Result<IngestReport>
    where
        F: Fn(IngestEvent) + Send + Sync,
    {
        let start = Instant::now();

        self.transition(IngestState::Loading, progress);
        let loader = Arc::clone(&self.loader);
        let documents = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        if documents.is_empty() {
            return Err(Error::NoDocumentsFound {
                location: self.loader.location(),
            });
        }
        tracing::info!("Loaded {} document pages", documents.len());
        progress(IngestEvent::DocumentsLoaded(documents.len()));

        self.transition(IngestState::Chunking, progress);
        let chunks = self.chunker.split_documents(&documents);
        if chunks.is_empty() {
            // Every page was whitespace after extraction
            return Err(Error::NoDocumentsFound {
                location: self.loader.location(),
            });
        }
        tracing::info!(
            "Created {} text chunks (size {}, overlap {})",
            chunks.len(),
            self.chunker.chunk_size(),
            self.chunker.overlap()
        );
        progress(IngestEvent::ChunksCreated(chunks.len()));

        self.transition(IngestState::EmbeddingAndPersisting, progress);
        tracing::info!(
            "Embedding {} chunks with {} ({})",
            chunks.len(),
            self.embedder.model(),
            self.embedder.name()
        );

        let total = chunks.len();
        let mut records = Vec::with_capacity(total);
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }
            records.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(embeddings)
                    .map(|(chunk, embedding)| StoredRecord::new(chunk, embedding)),
            );
            progress(IngestEvent::Embedded {
                done: records.len(),
                total,
            });
        }

        let store = Arc::clone(&self.store);
        let model = self.embedder.model().to_string();
        let persisted = tokio::task::spawn_blocking(move || store.rebuild(&model, records))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        Ok(IngestReport {
            documents: documents.len(),
            chunks: total,
            records: persisted,
            store_path: self.store.path().to_path_buf(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn transition<F>(&self, next: IngestState, progress: &F)
    where
        F: Fn(IngestEvent) + Send + Sync,
    {
        let previous = std::mem::replace(&mut *self.state.lock(), next);
        tracing::debug!("Ingestion state {:?} -> {:?}", previous, next);
        progress(IngestEvent::StateChanged(next));
    }
}
