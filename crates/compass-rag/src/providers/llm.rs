//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;

/// Trait for prompt completion
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.5-flash)
/// - `OllamaLlm`: Local Ollama server
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully rendered prompt
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Fail fast when the provider cannot possibly authenticate.
    ///
    /// Called before any retrieval work so a missing key never costs an
    /// embedding round trip.
    fn ensure_credentials(&self) -> Result<()> {
        Ok(())
    }

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
