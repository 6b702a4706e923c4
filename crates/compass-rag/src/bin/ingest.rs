//! Rebuild the vector store from the PDF directory
//!
//! Run with: cargo run -p compass-rag --bin compass-ingest -- --documents ./pdfs

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;

use compass_rag::{
    providers, telemetry, Error, IngestEvent, IngestState, IngestionPipeline, RagConfig,
};

#[derive(Parser)]
#[command(name = "compass-ingest", about = "Index college PDFs for question answering", version)]
struct Cli {
    /// Config file (defaults to ./compass.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory scanned recursively for PDFs
    #[arg(long)]
    documents: Option<PathBuf>,

    /// Vector store directory
    #[arg(long)]
    store: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("compass_rag=info");

    let cli = Cli::parse();
    let mut config = RagConfig::load(cli.config.as_deref())?;
    if let Some(documents) = cli.documents {
        config.documents.root = documents;
    }
    if let Some(store) = cli.store {
        config.vector_store.path = store;
    }
    config.validate()?;

    println!(
        "{} {} -> {}",
        style("Ingesting").bold(),
        config.documents.root.display(),
        config.vector_store.path.display()
    );

    let embedder = providers::embedder_from_config(&config.embeddings)?;
    let pipeline = IngestionPipeline::from_config(&config, embedder);

    let bar = ProgressBar::hidden();
    bar.set_style(
        ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} chunks embedded ({eta})")?
            .progress_chars("=> "),
    );

    let result = pipeline
        .run_with_progress(|event| match event {
            IngestEvent::StateChanged(IngestState::Loading) => println!("Loading documents..."),
            IngestEvent::StateChanged(IngestState::Chunking) => {
                println!("Splitting documents into chunks...")
            }
            IngestEvent::StateChanged(IngestState::EmbeddingAndPersisting) => {
                println!("Embedding chunks and saving to the vector store...");
                bar.set_draw_target(ProgressDrawTarget::stderr());
            }
            IngestEvent::DocumentsLoaded(n) => println!("  Loaded {} pages", n),
            IngestEvent::ChunksCreated(n) => {
                println!("  Split into {} chunks", n);
                bar.set_length(n as u64);
            }
            IngestEvent::Embedded { done, .. } => bar.set_position(done as u64),
            IngestEvent::StateChanged(state) => {
                if state.is_terminal() {
                    bar.finish_and_clear();
                }
            }
        })
        .await;

    match result {
        Ok(report) => {
            println!(
                "{} Saved {} chunks from {} pages to {} in {:.1}s",
                style("Done.").green().bold(),
                report.records,
                report.documents,
                report.store_path.display(),
                report.duration_ms as f64 / 1000.0
            );
            Ok(())
        }
        Err(e @ Error::NoDocumentsFound { .. }) => {
            println!("{} {}", style("Nothing to ingest.").yellow().bold(), e.user_message());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("Ingestion failed:").red().bold(), e.user_message());
            Err(e.into())
        }
    }
}
