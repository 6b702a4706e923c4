//! Error types for the RAG system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied unusable input (e.g. a blank question)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ingestion found nothing to ingest
    #[error("No PDF documents found under {location}")]
    NoDocumentsFound { location: String },

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Query against a store that was never built (or has been deleted)
    #[error("Vector store at {} is empty or has not been built", path.display())]
    EmptyStore { path: PathBuf },

    /// Query embeddings are incompatible with the stored collection
    #[error("Embedding model mismatch: store was built with {expected}, query uses {found}")]
    ModelMismatch { expected: String, found: String },

    /// Missing or rejected LLM credential
    #[error("Credential error: {0}")]
    Credential(String),

    /// Remote LLM call failed or timed out
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector database error
    #[error("Vector database error: {0}")]
    VectorDb(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse error
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector db error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create a credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::Toml(_) => "config_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::NoDocumentsFound { .. } => "no_documents_found",
            Error::FileParse { .. } => "parse_error",
            Error::EmptyStore { .. } => "empty_store",
            Error::ModelMismatch { .. } => "model_mismatch",
            Error::Credential(_) => "credential_error",
            Error::Generation(_) => "generation_error",
            Error::Embedding(_) => "embedding_error",
            Error::VectorDb(_) => "vector_db_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Message for end users: what went wrong and what to do about it
    pub fn user_message(&self) -> String {
        match self {
            Error::NoDocumentsFound { location } => format!(
                "No PDF documents were found under {}. Add PDF files there (or point \
                 documents.root at the right folder) and run compass-ingest again.",
                location
            ),
            Error::EmptyStore { path } => format!(
                "The document index at {} has not been built yet. Run compass-ingest first.",
                path.display()
            ),
            Error::ModelMismatch { expected, found } => format!(
                "The document index was built with {} but this query uses {}. \
                 Re-run compass-ingest with the current embedding settings.",
                expected, found
            ),
            Error::Credential(msg) => format!(
                "{}. Set the API key in your environment (for example \
                 `export GEMINI_API_KEY=...`) and try again.",
                msg
            ),
            Error::Generation(msg) => format!(
                "The language model could not produce an answer: {}. Check your network \
                 connection and API key validity, then try again.",
                msg
            ),
            Error::InvalidInput(msg) => format!("{}.", msg),
            other => other.to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Config(_) | Error::Toml(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidInput(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::NoDocumentsFound { .. } => StatusCode::NOT_FOUND,
            Error::FileParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::EmptyStore { .. } | Error::Credential(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::ModelMismatch { .. } => StatusCode::CONFLICT,
            Error::Generation(_) => StatusCode::BAD_GATEWAY,
            Error::Embedding(_) | Error::VectorDb(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": {
                "type": self.kind(),
                "message": self.user_message(),
            }
        }));

        (status, body).into_response()
    }
}
