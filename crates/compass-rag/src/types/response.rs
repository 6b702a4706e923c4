//! Retrieval and answer types returned to callers

use serde::{Deserialize, Serialize};

use super::document::Chunk;

/// A stored chunk matched by a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The matched chunk
    pub chunk: Chunk,
    /// Cosine distance to the query (0.0 is identical, lower is better)
    pub score: f32,
}

/// Ranked matches for one query, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalResult {
    matches: Vec<RetrievedChunk>,
}

impl RetrievalResult {
    /// Wrap matches, sorting them best first
    pub fn new(mut matches: Vec<RetrievedChunk>) -> Self {
        matches.sort_by(|a, b| a.score.total_cmp(&b.score));
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetrievedChunk> {
        self.matches.iter()
    }

    pub fn matches(&self) -> &[RetrievedChunk] {
        &self.matches
    }

    /// Citations for every match, in rank order
    pub fn citations(&self) -> Vec<Citation> {
        self.matches.iter().map(Citation::from_match).collect()
    }
}

/// Generated answer plus the retrieval it was conditioned on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Raw LLM response text
    pub text: String,
    /// Chunks the answer was generated from
    pub sources: RetrievalResult,
}

impl Answer {
    pub fn new(text: String, sources: RetrievalResult) -> Self {
        Self { text, sources }
    }

    pub fn citations(&self) -> Vec<Citation> {
        self.sources.citations()
    }
}

/// Citation of a source document page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Full source path
    pub source: String,
    /// File name for display
    pub filename: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Retrieval distance
    pub score: f32,
    /// Exact snippet from the source
    pub snippet: String,
}

impl Citation {
    /// Create a citation from a retrieval match
    pub fn from_match(m: &RetrievedChunk) -> Self {
        Self {
            source: m.chunk.source.path.display().to_string(),
            filename: m.chunk.source.file_name(),
            page: m.chunk.source.page,
            score: m.score,
            snippet: m.chunk.content.clone(),
        }
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        format!(
            "Source: {} (Page: {}) (Score: {:.4})",
            self.source, self.page, self.score
        )
    }
}
