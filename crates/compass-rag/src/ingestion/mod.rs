//! Document ingestion: PDF loading, chunking and store rebuilds

mod chunker;
pub mod loader;
mod pipeline;

pub use chunker::TextChunker;
pub use loader::{cleanup_pdf_text, DocumentLoader, PdfDirectoryLoader};
pub use pipeline::{IngestEvent, IngestReport, IngestState, IngestionPipeline};
