//! Core types for the RAG system

pub mod document;
pub mod response;

pub use document::{Chunk, Document, DocumentSource, StoredRecord};
pub use response::{Answer, Citation, RetrievalResult, RetrievedChunk};
