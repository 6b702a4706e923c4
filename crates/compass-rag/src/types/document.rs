//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Where a piece of text came from (used for citations)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Path of the source file as discovered during ingestion
    pub path: PathBuf,
    /// Page number (1-indexed)
    pub page: u32,
}

impl DocumentSource {
    /// Create source info for a page of a file
    pub fn new(path: impl Into<PathBuf>, page: u32) -> Self {
        Self {
            path: path.into(),
            page,
        }
    }

    /// File name without directories, falling back to the full path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Format source for display
    pub fn format_citation(&self) -> String {
        format!("{}, Page {}", self.file_name(), self.page)
    }
}

/// Raw text of one page of a source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text
    pub text: String,
    /// Origin of the text
    pub source: DocumentSource,
}

impl Document {
    pub fn new(text: impl Into<String>, source: DocumentSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// A chunk of text from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Source information inherited from the parent document
    pub source: DocumentSource,
    /// Chunk index within its document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: String, source: DocumentSource, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            source,
            chunk_index,
        }
    }
}

/// A chunk together with its embedding, as persisted in the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

impl StoredRecord {
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }
}
