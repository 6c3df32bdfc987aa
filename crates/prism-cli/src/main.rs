//! prism - ask questions about a PDF, answered from its text and images.
//!
//! On first run the PDF is extracted, split into nodes, and indexed into a
//! sqlite-vec database under the storage directory. Later runs reuse that
//! index. Queries are read from stdin and answers printed to stdout; logs go
//! to stderr.
//!
//! # Configuration
//!
//! - `OPENAI_API_KEY` - Required for embeddings and the multimodal model
//! - `PRISM_STORAGE_DIR` - Optional, defaults to `./storage_nodes`
//! - `PRISM_IMAGE_DIR` - Optional, defaults to `./data_images`
//! - `RUST_LOG` - Optional log filter
//!
//! # Usage
//!
//! ```text
//! prism --top-k 9 PDFs/User_manual.pdf
//! ```

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prism_cli::{ensure_index, load_config, run_query_loop, Args};
use prism_core::{FsImageStore, MultimodalQueryEngine, NodeBuilder, TiktokenTokenizer, VectorIndex};
use prism_embeddings::EmbedderFactory;
use prism_extractors::ExtractionPipeline;
use prism_llm::LlmFactory;
use prism_vector_stores::VectorStoreFactory;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Stdout is reserved for answers
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,prism=debug")),
        )
        .init();

    let args = Args::parse();
    tracing::info!("Starting prism");

    let config = load_config(&args)?;

    if !args.pdf.exists() {
        tracing::error!("PDF file not found: {}", args.pdf.display());
        bail!("PDF file not found: {}", args.pdf.display());
    }

    let llm = LlmFactory::from_config(&config.llm)?;
    let embedder = EmbedderFactory::from_config(&config.embedder)?;

    std::fs::create_dir_all(&config.storage_dir)?;
    tracing::info!("Storage directory: {}", config.storage_dir.display());
    let store = VectorStoreFactory::create(config.resolved_vector_store()).await?;
    let index = VectorIndex::new(embedder, store);

    let builder = NodeBuilder::from_config(
        Arc::new(TiktokenTokenizer::cl100k()?),
        Arc::new(FsImageStore::new(&config.image_dir)),
        &config.chunking,
    )?;
    ensure_index(&index, &ExtractionPipeline::with_defaults(), &builder, &args.pdf).await?;

    let engine = MultimodalQueryEngine::new(
        Arc::new(index.as_retriever(config.retrieval.top_k)),
        llm,
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_query_loop(&engine, stdin, std::io::stdout()).await?;

    tracing::info!("Exiting prism");
    Ok(())
}
