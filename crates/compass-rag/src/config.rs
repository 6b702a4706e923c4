//! Configuration for the RAG system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "compass.toml";

/// Upper bound for `embeddings.max_retries`
pub const MAX_EMBEDDING_RETRIES: u32 = 10;

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Where the source PDFs live
    pub documents: DocumentsConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// LLM configuration
    pub llm: LlmConfig,
    /// Vector store configuration
    pub vector_store: VectorStoreConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Web server configuration
    pub server: ServerConfig,
}

impl RagConfig {
    /// Load configuration.
    ///
    /// Reads `path` when given, otherwise `./compass.toml` if it exists, otherwise
    /// uses defaults. Environment overrides are applied last, then the result is
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(dir) = env_value("COMPASS_DOCUMENTS_DIR") {
            self.documents.root = PathBuf::from(dir);
        }
        if let Some(path) = env_value("COMPASS_STORE_PATH") {
            self.vector_store.path = PathBuf::from(path);
        }
        if let Some(model) = env_value("COMPASS_LLM_MODEL") {
            self.llm.model = model;
        }
    }

    /// Reject settings the pipelines cannot work with
    pub fn validate(&self) -> Result<()> {
        let chunking = &self.chunking;
        if chunking.separator.is_empty() {
            return Err(Error::Config("chunking.separator must not be empty".to_string()));
        }
        if chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be positive".to_string()));
        }
        if chunking.chunk_overlap >= chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                chunking.chunk_overlap, chunking.chunk_size
            )));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embeddings.dimensions must be positive".to_string()));
        }
        if self.embeddings.max_retries > MAX_EMBEDDING_RETRIES {
            return Err(Error::Config(format!(
                "embeddings.max_retries ({}) must be at most {}",
                self.embeddings.max_retries, MAX_EMBEDDING_RETRIES
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Source document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Directory scanned recursively for PDFs
    pub root: PathBuf,
    /// File extension to ingest (matched case-insensitively)
    pub extension: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: "pdf".to_string(),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Preferred split boundary
    pub separator: String,
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Characters repeated between consecutive chunks of one document
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            separator: "\n\n".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// Offline feature-hashing embedder
    Hashing,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which embedder to use
    pub provider: EmbeddingBackend,
    /// Embedding model name (must match between ingestion and querying)
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
    /// Ollama base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed embedding requests
    pub max_retries: u32,
    /// Texts embedded per progress step during ingestion
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::Ollama,
            model: "all-minilm".to_string(),
            dimensions: 384,
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 60,
            max_retries: 2,
            batch_size: 16,
        }
    }
}

/// LLM backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Google Gemini (Generative Language API)
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which LLM to call
    pub provider: LlmBackend,
    /// Generation model name
    pub model: String,
    /// API base URL; provider default when unset
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmBackend::Gemini,
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 120,
            max_output_tokens: 2048,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        env_value(&self.api_key_env)
    }

    /// Base URL with the provider default filled in
    pub fn resolved_base_url(&self) -> String {
        let url = match (&self.base_url, self.provider) {
            (Some(url), _) => url.as_str(),
            (None, LlmBackend::Gemini) => "https://generativelanguage.googleapis.com/v1beta",
            (None, LlmBackend::Ollama) => "http://localhost:11434",
        };
        url.trim_end_matches('/').to_string()
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Directory holding the persisted collection
    pub path: PathBuf,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("compass_db"),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the LLM
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}
