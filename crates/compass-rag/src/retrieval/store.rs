//! File-backed vector store with atomic full rebuilds
//!
//! Layout on disk:
//!
//! ```text
//! <path>/manifest.json   model, dimensions, record count, build time
//! <path>/records.json    chunks with their embeddings
//! ```
//!
//! A rebuild writes a complete new collection into a hidden sibling directory
//! and swaps it in with two renames, so readers never see a half-written store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::VectorStoreConfig;
use crate::error::{Error, Result};
use crate::types::{RetrievedChunk, StoredRecord};

const MANIFEST_FILE: &str = "manifest.json";
const RECORDS_FILE: &str = "records.json";

/// On-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Metadata describing a built collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    pub format_version: u32,
    /// Embedding model the collection was built with
    pub embedding_model: String,
    pub dimensions: usize,
    pub record_count: usize,
    pub built_at: DateTime<Utc>,
}

/// Persistent collection of embedded chunks
#[derive(Debug, Clone)]
pub struct VectorStore {
    path: PathBuf,
}

impl VectorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &VectorStoreConfig) -> Self {
        Self::new(config.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a built collection is present
    pub fn exists(&self) -> bool {
        self.path.join(MANIFEST_FILE).is_file()
    }

    /// Read the collection manifest
    pub fn manifest(&self) -> Result<StoreManifest> {
        let file = self.open(MANIFEST_FILE)?;
        let manifest: StoreManifest = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::vector_db(format!("Corrupt store manifest: {}", e)))?;

        if manifest.format_version != FORMAT_VERSION {
            return Err(Error::vector_db(format!(
                "Unsupported store format version {} (expected {})",
                manifest.format_version, FORMAT_VERSION
            )));
        }
        Ok(manifest)
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        Ok(self.manifest()?.record_count)
    }

    /// Replace the whole collection with `records`.
    ///
    /// On any failure before the swap the previous collection is left untouched.
    pub fn rebuild(&self, embedding_model: &str, records: Vec<StoredRecord>) -> Result<usize> {
        let dimensions = match records.first() {
            Some(first) => first.embedding.len(),
            None => return Err(Error::vector_db("Refusing to build an empty collection")),
        };
        if dimensions == 0 {
            return Err(Error::vector_db("Records have empty embeddings"));
        }
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != dimensions) {
            return Err(Error::vector_db(format!(
                "Inconsistent embedding dimensions: expected {}, chunk {} has {}",
                dimensions,
                bad.chunk.id,
                bad.embedding.len()
            )));
        }

        let manifest = StoreManifest {
            format_version: FORMAT_VERSION,
            embedding_model: embedding_model.to_string(),
            dimensions,
            record_count: records.len(),
            built_at: Utc::now(),
        };

        let parent = self.parent_dir();
        fs::create_dir_all(&parent)?;

        let staging = parent.join(format!(".{}.staging-{}", self.dir_name(), Uuid::new_v4()));
        if let Err(e) = write_collection(&staging, &manifest, &records) {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        self.swap_in(&parent, &staging)?;

        tracing::info!(
            "Vector store at {} rebuilt with {} records ({} dims, model {})",
            self.path.display(),
            manifest.record_count,
            dimensions,
            embedding_model
        );
        Ok(manifest.record_count)
    }

    /// Up to `k` records closest to `query`, best (lowest distance) first
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        let manifest = self.manifest()?;
        if manifest.record_count == 0 {
            return Err(Error::EmptyStore {
                path: self.path.clone(),
            });
        }
        if query.len() != manifest.dimensions {
            return Err(Error::ModelMismatch {
                expected: format!("{} ({} dims)", manifest.embedding_model, manifest.dimensions),
                found: format!("{} dims", query.len()),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let records = self.load_records()?;
        let mut scored: Vec<RetrievedChunk> = records
            .into_iter()
            .map(|record| RetrievedChunk {
                score: cosine_distance(query, &record.embedding),
                chunk: record.chunk,
            })
            .collect();

        scored.sort_by(|a, b| a.score.total_cmp(&b.score));
        scored.truncate(k);
        Ok(scored)
    }

    fn load_records(&self) -> Result<Vec<StoredRecord>> {
        let file = self.open(RECORDS_FILE)?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::vector_db(format!("Corrupt store records: {}", e)))
    }

    fn open(&self, name: &str) -> Result<File> {
        File::open(self.path.join(name)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::EmptyStore {
                path: self.path.clone(),
            },
            _ => Error::Io(e),
        })
    }

    fn swap_in(&self, parent: &Path, staging: &Path) -> Result<()> {
        if !self.path.exists() {
            return fs::rename(staging, &self.path).map_err(|e| {
                let _ = fs::remove_dir_all(staging);
                Error::Io(e)
            });
        }

        let old = parent.join(format!(".{}.old-{}", self.dir_name(), Uuid::new_v4()));
        if let Err(e) = fs::rename(&self.path, &old) {
            let _ = fs::remove_dir_all(staging);
            return Err(Error::Io(e));
        }

        if let Err(e) = fs::rename(staging, &self.path) {
            // Put the previous collection back
            if let Err(restore) = fs::rename(&old, &self.path) {
                tracing::error!(
                    "Failed to restore previous store from {}: {}",
                    old.display(),
                    restore
                );
            }
            let _ = fs::remove_dir_all(staging);
            return Err(Error::Io(e));
        }

        if let Err(e) = fs::remove_dir_all(&old) {
            tracing::warn!("Could not remove previous store {}: {}", old.display(), e);
        }
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "store".to_string())
    }
}

fn write_collection(dir: &Path, manifest: &StoreManifest, records: &[StoredRecord]) -> Result<()> {
    fs::create_dir_all(dir)?;

    let mut writer = BufWriter::new(File::create(dir.join(RECORDS_FILE))?);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;

    // Manifest last: its presence marks a complete collection
    let mut writer = BufWriter::new(File::create(dir.join(MANIFEST_FILE))?);
    serde_json::to_writer_pretty(&mut writer, manifest)?;
    writer.flush()?;
    Ok(())
}

/// `1 - cosine_similarity`; 1.0 when either vector has zero magnitude
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}
