//! Application state for the web server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::query::QueryPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Question answering pipeline, shared by all requests
    pipeline: QueryPipeline,
}

impl AppState {
    /// Create state with the providers named in `config`
    pub fn new(config: RagConfig) -> Result<Self> {
        let pipeline = QueryPipeline::from_config(&config)?;
        Ok(Self::from_pipeline(config, pipeline))
    }

    /// Create state around an existing pipeline
    pub fn from_pipeline(config: RagConfig, pipeline: QueryPipeline) -> Self {
        if !pipeline.credentials_available() {
            tracing::warn!(
                "{} is not set; questions will fail until it is",
                config.llm.api_key_env
            );
        }
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.inner.pipeline
    }
}
