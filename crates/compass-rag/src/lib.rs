//! compass-rag: question answering over a folder of college PDFs
//!
//! Ingestion reads every PDF under a directory, splits page text into
//! overlapping chunks, embeds them and rebuilds a file-backed vector store.
//! Querying embeds a question, fetches the closest chunks and asks an LLM to
//! answer only from them, returning the answer with page-level sources.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod query;
pub mod retrieval;
pub mod server;
pub mod telemetry;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use ingestion::{IngestEvent, IngestReport, IngestState, IngestionPipeline};
pub use query::QueryPipeline;
pub use retrieval::{Retriever, VectorStore};
pub use types::{Answer, Chunk, Citation, Document, DocumentSource, RetrievalResult};
