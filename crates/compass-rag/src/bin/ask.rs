//! Ask a single question from the terminal
//!
//! Run with: cargo run -p compass-rag --bin compass-ask -- "When is the midterm?"

use clap::Parser;
use console::style;
use indicatif::ProgressBar;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use compass_rag::{telemetry, QueryPipeline, RagConfig};

#[derive(Parser)]
#[command(name = "compass-ask", about = "Ask a question about the indexed PDFs", version)]
struct Cli {
    /// Config file (defaults to ./compass.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of chunks to retrieve
    #[arg(long)]
    top_k: Option<usize>,

    /// The question; prompted for when omitted
    question: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("compass_rag=warn");

    let cli = Cli::parse();
    let config = RagConfig::load(cli.config.as_deref())?;

    let pipeline = QueryPipeline::from_config(&config)?;
    if let Err(e) = pipeline.ensure_credentials() {
        eprintln!("{} {}", style("Error:").red().bold(), e.user_message());
        std::process::exit(1);
    }

    let question = if cli.question.is_empty() {
        print!("Enter your question: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line.trim().to_string()
    } else {
        cli.question.join(" ")
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Searching documents and generating an answer...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = match cli.top_k {
        Some(k) => pipeline.answer_question_top(&question, k).await,
        None => pipeline.answer_question(&question).await,
    };
    spinner.finish_and_clear();

    let answer = match result {
        Ok(answer) => answer,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e.user_message());
            std::process::exit(1);
        }
    };

    println!("\n{}\n{}\n", style("Answer:").green().bold(), answer.text.trim());
    println!("{}", style("Sources:").bold());
    for citation in answer.citations() {
        println!("  {}", citation.format_inline());
    }

    Ok(())
}
