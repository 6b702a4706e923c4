//! Text chunking with separator-first splitting and character overlap

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Document};

/// Text chunker with configurable separator, size and overlap
///
/// Text is split on the separator and the pieces are merged greedily into chunks
/// of at most `chunk_size` characters. When a chunk is closed, the next one starts
/// with the last `chunk_overlap` characters of it. A piece that cannot fit even on
/// its own is cut into `chunk_size` windows that overlap by `chunk_overlap`.
#[derive(Debug, Clone)]
pub struct TextChunker {
    separator: String,
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. `overlap` is clamped below `chunk_size`.
    pub fn new(separator: impl Into<String>, chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            separator: separator.into(),
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.separator.clone(), config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split every document, keeping each chunk's source equal to its document's
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        if documents.is_empty() {
            tracing::warn!("No documents to split, returning no chunks");
            return Vec::new();
        }

        let mut chunks = Vec::new();
        for doc in documents {
            let pieces = self.split_text(&doc.text);
            tracing::debug!(
                "{} -> {} chunks",
                doc.source.format_citation(),
                pieces.len()
            );
            chunks.extend(
                pieces
                    .into_iter()
                    .enumerate()
                    .map(|(i, content)| Chunk::new(content, doc.source.clone(), i as u32)),
            );
        }

        chunks
    }

    /// Split raw text into chunk strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let separator_len = char_len(&self.separator);
        let mut chunks = Vec::new();
        let mut current = String::new();

        for unit in text
            .split(self.separator.as_str())
            .filter(|u| !u.trim().is_empty())
        {
            if current.is_empty() {
                self.open_chunk(&mut chunks, &mut current, unit.to_string());
                continue;
            }

            if char_len(&current) + separator_len + char_len(unit) <= self.chunk_size {
                current.push_str(&self.separator);
                current.push_str(unit);
                continue;
            }

            // Close the current chunk and carry its tail into the next one
            let tail = tail_chars(&current, self.overlap).to_string();
            chunks.push(std::mem::take(&mut current));

            let seeded = if tail.is_empty() {
                unit.to_string()
            } else {
                format!("{}{}{}", tail, self.separator, unit)
            };
            self.open_chunk(&mut chunks, &mut current, seeded);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Make `text` the open chunk, emitting leading windows first if it is oversized
    fn open_chunk(&self, chunks: &mut Vec<String>, current: &mut String, text: String) {
        let mut windows = self.hard_split(&text);
        if windows.len() > 1 {
            tracing::debug!(
                "Segment of {} chars exceeds chunk size {}, split into {} windows",
                char_len(&text),
                self.chunk_size,
                windows.len()
            );
        }
        if let Some(last) = windows.pop() {
            *current = last;
        }
        chunks.extend(windows);
    }

    /// Cut text into `chunk_size` windows advancing by `chunk_size - overlap`
    fn hard_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let step = self.chunk_size - self.overlap;
        let mut windows = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(chars.len());
            windows.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        windows
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Last `n` characters of `text` (all of it when shorter)
fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
