//! Compass web UI
//!
//! Run with: cargo run -p compass-rag --bin compass-web

use clap::Parser;
use console::style;
use std::path::PathBuf;

use compass_rag::{server::CompassServer, telemetry, RagConfig};

#[derive(Parser)]
#[command(name = "compass-web", about = "Serve the question answering web UI", version)]
struct Cli {
    /// Config file (defaults to ./compass.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("compass_rag=info,tower_http=debug");

    let cli = Cli::parse();
    let mut config = RagConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Vector store: {}", config.vector_store.path.display());
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM model: {}", config.llm.model);

    let server = CompassServer::new(config)?;

    println!("\n{}", style("College Compass").bold());
    println!("  UI:     http://{}", server.address());
    println!("  API:    POST http://{}/api/query", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
