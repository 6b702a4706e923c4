//! Vector storage and top-k retrieval

mod retriever;
pub mod store;

pub use retriever::{Retriever, DEFAULT_TOP_K};
pub use store::{cosine_distance, StoreManifest, VectorStore};
