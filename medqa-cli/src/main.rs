//! `medqa` — build and query a closed-corpus healthcare document assistant.
//!
//! - `medqa ingest`  builds a persisted index from a directory of PDFs
//! - `medqa chat`    answers questions against a persisted index
//! - `medqa sources` lists the documents available for `--source` scoping

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

use medqa_chat::{Answer, ChatSession, Composer, OpenAIChatGenerator};
use medqa_rag::{
    DiskVectorStore, Ingestor, OpenAIEmbeddingProvider, RagConfig, RecursiveChunker, Retriever,
    VectorStore,
};

#[derive(Parser)]
#[command(name = "medqa", version, about = "Closed-corpus healthcare document QA")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a persisted index from a directory of PDF documents.
    Ingest {
        /// Directory containing the PDF corpus (non-recursive).
        #[arg(long)]
        corpus: PathBuf,
        /// Path the index file is written to (overwritten if present).
        #[arg(long)]
        index: PathBuf,
    },
    /// Ask questions against a persisted index.
    Chat {
        /// Path to the persisted index file.
        #[arg(long)]
        index: PathBuf,
        /// Restrict retrieval to one source document (file name).
        #[arg(long)]
        source: Option<String>,
        /// Answer a single question and exit instead of starting a REPL.
        #[arg(long)]
        question: Option<String>,
    },
    /// List the source documents in a persisted index.
    Sources {
        /// Path to the persisted index file.
        #[arg(long)]
        index: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ingest { corpus, index } => ingest(corpus, index).await,
        Command::Chat { index, source, question } => chat(index, source, question).await,
        Command::Sources { index } => sources(index).await,
    }
}

async fn ingest(corpus: PathBuf, index: PathBuf) -> anyhow::Result<()> {
    let config = RagConfig::default();
    let embedder =
        Arc::new(OpenAIEmbeddingProvider::from_env().context("embedding credentials")?);
    let store = Arc::new(DiskVectorStore::new());

    let ingestor = Ingestor::builder()
        .chunker(Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)))
        .embedding_provider(embedder)
        .vector_store(store.clone())
        .build()?;

    let report = ingestor.ingest(&corpus).await.context("ingestion failed")?;
    store.persist(&index).await.context("failed to persist index")?;

    println!("Loaded pages: {}", report.pages);
    println!("Created chunks: {}", report.chunks);
    println!("Index written to {}", index.display());
    Ok(())
}

async fn chat(
    index: PathBuf,
    source: Option<String>,
    question: Option<String>,
) -> anyhow::Result<()> {
    // Credentials must fail at startup, not on the first question.
    let embedder =
        Arc::new(OpenAIEmbeddingProvider::from_env().context("embedding credentials")?);
    let generator =
        Arc::new(OpenAIChatGenerator::from_env().context("generation credentials")?);

    let store = Arc::new(DiskVectorStore::open(&index).context("failed to open index")?);
    let retriever = Arc::new(Retriever::new(RagConfig::default(), embedder, store));

    let composer =
        Composer::builder().evidence_source(retriever).generator(generator).build()?;
    let mut session = ChatSession::new(composer);

    if let Some(question) = question {
        let answer = session.ask(&question, source.as_deref()).await?;
        print_answer(&answer);
        return Ok(());
    }

    println!("MedQA — answers come only from the indexed documents; type 'exit' to quit.");
    if let Some(source) = &source {
        println!("Scoped to source: {source}");
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("medqa> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if question == "exit" || question == "quit" {
                    break;
                }
                let _ = editor.add_history_entry(question);
                match session.ask(question, source.as_deref()).await {
                    Ok(answer) => print_answer(&answer),
                    Err(e) => {
                        warn!(error = %e, "query failed");
                        eprintln!("error: {e}");
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn sources(index: PathBuf) -> anyhow::Result<()> {
    let store = DiskVectorStore::open(&index).context("failed to open index")?;
    for source in store.source_ids().await? {
        println!("{source}");
    }
    Ok(())
}

fn print_answer(answer: &Answer) {
    println!("{}", answer.text);
    if !answer.citations.is_empty() {
        println!("\nSources:");
        for citation in &answer.citations {
            println!("  - {citation}");
        }
    }
}
