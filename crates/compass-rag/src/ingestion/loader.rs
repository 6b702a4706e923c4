//! PDF discovery and page-level text extraction

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::DocumentsConfig;
use crate::error::{Error, Result};
use crate::types::{Document, DocumentSource};

/// Source of documents for the ingestion pipeline
pub trait DocumentLoader: Send + Sync {
    /// Load every available document. Unreadable inputs are skipped, not fatal.
    fn load(&self) -> Result<Vec<Document>>;

    /// Human-readable description of where documents come from
    fn location(&self) -> String;
}

/// Loads every PDF under a directory tree, one document per page
pub struct PdfDirectoryLoader {
    root: PathBuf,
    extension: String,
}

impl PdfDirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "pdf".to_string(),
        }
    }

    pub fn from_config(config: &DocumentsConfig) -> Self {
        Self {
            root: config.root.clone(),
            extension: config.extension.trim_start_matches('.').to_lowercase(),
        }
    }

    /// All matching files under the root, sorted for stable ingestion order
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    }

    /// Extract the pages of a single PDF
    pub fn load_pdf(path: &Path) -> Result<Vec<Document>> {
        let data = std::fs::read(path)?;
        let filename = path.display().to_string();

        let pdf = lopdf::Document::load_mem(&data)
            .map_err(|e| Error::file_parse(&filename, format!("Failed to load PDF: {}", e)))?;

        let mut documents = Vec::new();
        for page_number in pdf.get_pages().keys() {
            match pdf.extract_text(&[*page_number]) {
                Ok(text) => {
                    let text = cleanup_pdf_text(&text);
                    if !text.trim().is_empty() {
                        documents.push(Document::new(text, DocumentSource::new(path, *page_number)));
                    }
                }
                Err(e) => {
                    tracing::debug!("Could not extract page {} of {}: {}", page_number, filename, e);
                }
            }
        }

        if documents.is_empty() {
            // Some fonts defeat lopdf's per-page extraction; pdf-extract handles more of them
            tracing::debug!("No per-page text in {}, trying whole-document extraction", filename);
            let text = pdf_extract::extract_text_from_mem(&data)
                .map_err(|e| Error::file_parse(&filename, e.to_string()))?;
            let text = cleanup_pdf_text(&text);
            if text.trim().is_empty() {
                return Err(Error::file_parse(
                    &filename,
                    "PDF appears to be image-based or has no extractable text",
                ));
            }
            documents.push(Document::new(text, DocumentSource::new(path, 1)));
        }

        Ok(documents)
    }
}

impl DocumentLoader for PdfDirectoryLoader {
    fn load(&self) -> Result<Vec<Document>> {
        let files = self.discover();
        tracing::info!("Found {} PDF files under {}", files.len(), self.root.display());

        let mut documents = Vec::new();
        for path in files {
            match Self::load_pdf(&path) {
                Ok(pages) => {
                    tracing::debug!("Loaded {} pages from {}", pages.len(), path.display());
                    documents.extend(pages);
                }
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        Ok(documents)
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Normalise extracted PDF text.
///
/// Folds typographic glyphs to ASCII, drops NULs and trailing whitespace, and
/// collapses runs of blank lines into a single paragraph break.
pub fn cleanup_pdf_text(text: &str) -> String {
    let folded = text
        .replace('\0', "")
        .replace('\r', "")
        .replace(['\u{2010}', '\u{2011}', '\u{2013}'], "-")
        .replace('\u{2014}', "--")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl");

    let mut out = String::with_capacity(folded.len());
    let mut blank_run = 0usize;
    for line in folded.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = 0;
    }
    out
}
