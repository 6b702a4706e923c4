//! Shared test doubles and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use compass_rag::config::EmbeddingBackend;
use compass_rag::ingestion::{DocumentLoader, TextChunker};
use compass_rag::providers::{EmbeddingProvider, HashingEmbedder, LlmProvider};
use compass_rag::{Document, DocumentSource, Error, IngestionPipeline, RagConfig, Result, VectorStore};

/// Loader serving fixed pages
pub struct StaticLoader {
    documents: Vec<Document>,
}

impl StaticLoader {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentLoader for StaticLoader {
    fn load(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }

    fn location(&self) -> String {
        "static fixtures".to_string()
    }
}

/// Hashing embedder with a configurable model name, call counting and failure injection
pub struct TestEmbedder {
    inner: HashingEmbedder,
    model: String,
    calls: AtomicUsize,
    fail: bool,
}

impl TestEmbedder {
    pub fn new() -> Self {
        Self::with_model(compass_rag::providers::HASHING_MODEL)
    }

    pub fn with_model(model: &str) -> Self {
        Self {
            inner: HashingEmbedder::new(256),
            model: model.to_string(),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for TestEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::embedding("embedding service unavailable"));
        }
        Ok(self.inner.embed_text(text))
    }

    fn dimensions(&self) -> usize {
        256
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// LLM double that answers through a closure and records prompts
pub struct ScriptedLlm {
    reply: Box<dyn Fn(&str) -> String + Send + Sync>,
    has_key: bool,
    failure: Option<String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_temperature: Mutex<Option<f32>>,
}

impl ScriptedLlm {
    pub fn new(reply: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            has_key: true,
            failure: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_temperature: Mutex::new(None),
        }
    }

    /// Answers "Week 8" questions from context, otherwise says it doesn't know
    pub fn course_assistant() -> Self {
        Self::new(|prompt| {
            let question = prompt.split("Question:").nth(1).unwrap_or_default();
            if question.to_lowercase().contains("midterm") && prompt.contains("Week 8") {
                "The midterm exam is held in Week 8 during the regular lecture time.".to_string()
            } else {
                "I don't know. The information is not found in the provided context.".to_string()
            }
        })
    }

    pub fn without_key() -> Self {
        Self {
            has_key: false,
            ..Self::course_assistant()
        }
    }

    /// Has a key, but every completion fails with a generation error
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::course_assistant()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }

    pub fn last_temperature(&self) -> Option<f32> {
        *self.last_temperature.lock()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        self.ensure_credentials()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());
        *self.last_temperature.lock() = Some(temperature);
        if let Some(message) = &self.failure {
            return Err(Error::generation(message.clone()));
        }
        Ok((self.reply)(prompt))
    }

    fn ensure_credentials(&self) -> Result<()> {
        if self.has_key {
            Ok(())
        } else {
            Err(Error::credential("GEMINI_API_KEY is not set"))
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Pages of a small course syllabus plus an unrelated handbook
pub fn course_documents() -> Vec<Document> {
    vec![
        Document::new(
            "Course: Introduction to Biology.\n\nInstructor: Dr. Rivera. Office hours are Tuesdays at 3pm in Room 204.",
            DocumentSource::new("docs/syllabus.pdf", 1),
        ),
        Document::new(
            "Midterm exam: The midterm exam is held in Week 8 during the regular lecture time.\n\nFinal exam: The final exam is held in Week 15.",
            DocumentSource::new("docs/syllabus.pdf", 2),
        ),
        Document::new(
            "Parking permits are available at the campus kiosk.\n\nThe library is open until midnight on weekdays.",
            DocumentSource::new("docs/handbook.pdf", 1),
        ),
    ]
}

/// Config using the offline embedder and a store under `dir`
pub fn test_config(dir: &Path) -> RagConfig {
    let mut config = RagConfig::default();
    config.embeddings.provider = EmbeddingBackend::Hashing;
    config.embeddings.dimensions = 256;
    config.vector_store.path = dir.join("compass_db");
    config
}

/// Ingestion pipeline over in-memory documents
pub fn ingestion(
    documents: Vec<Document>,
    embedder: Arc<dyn EmbeddingProvider>,
    store_path: &Path,
) -> IngestionPipeline {
    IngestionPipeline::new(
        Arc::new(StaticLoader::new(documents)),
        TextChunker::default(),
        embedder,
        Arc::new(VectorStore::new(store_path)),
    )
}

/// Build the course store under `dir` and return its config
pub async fn build_course_store(dir: &Path) -> RagConfig {
    let config = test_config(dir);
    ingestion(
        course_documents(),
        Arc::new(TestEmbedder::new()),
        &config.vector_store.path,
    )
    .run()
    .await
    .unwrap();
    config
}

/// Write a minimal PDF with one line of Courier text per page
pub fn write_pdf(path: &Path, pages: &[&str]) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
