//! Command-line front end for prism.
//!
//! Wires extraction, node building, the vector index and the multimodal
//! query engine into a single interactive session over one PDF.
//!
//! # Configuration
//!
//! Settings are read, in increasing priority, from:
//!
//! - `--config FILE`, or `<config dir>/prism/config.toml` when present
//! - environment variables (`OPENAI_API_KEY`, `PRISM_*`), including a `.env` file
//! - command-line flags

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use prism_core::{MultimodalQueryEngine, NodeBuilder, PrismConfig, VectorIndex};
use prism_extractors::ExtractionPipeline;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

/// Prompt shown before each query.
pub const QUERY_PROMPT: &str = "Enter your query (or 'quit' to exit): ";

/// Ask questions about a PDF, answered from its text and images.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(about = "Multimodal question answering over a PDF document")]
pub struct Args {
    /// PDF document to index and query.
    pub pdf: PathBuf,

    /// Configuration file (TOML, JSON, or YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted vector index.
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Directory extracted images are written to.
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Number of nodes retrieved per query.
    #[arg(long)]
    pub top_k: Option<usize>,
}

/// Resolve configuration from file, environment, and flags, then validate it.
pub fn load_config(args: &Args) -> Result<PrismConfig> {
    let file = args.config.clone().or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("prism").join("config.toml"))
            .filter(|path| path.exists())
    });

    let mut config = match file {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            PrismConfig::from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => PrismConfig::default(),
    };
    config.apply_env();

    if let Some(dir) = &args.storage_dir {
        config.storage_dir = dir.clone();
    }
    if let Some(dir) = &args.image_dir {
        config.image_dir = dir.clone();
    }
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }

    config.validate()?;
    Ok(config)
}

/// Document id derived from the file name, e.g. `manual` for `docs/manual.pdf`.
pub fn document_id(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.trim().is_empty())
        .map(str::to_string)
        .with_context(|| format!("cannot derive a document id from {}", path.display()))
}

/// Reuse a populated index, or extract the document and index it.
///
/// Returns the number of indexed nodes.
pub async fn ensure_index(
    index: &VectorIndex,
    pipeline: &ExtractionPipeline,
    builder: &NodeBuilder,
    document: &Path,
) -> Result<usize> {
    if !index.is_empty().await? {
        let count = index.len().await?;
        info!(nodes = count, "Loading existing index");
        return Ok(count);
    }

    info!("Creating new index from {}", document.display());
    let extracted = pipeline.extract_path(document).await?;
    info!(
        characters = extracted.text.len(),
        images = extracted.images.len(),
        "Processed document"
    );

    let nodes = builder.build_nodes(&document_id(document)?, &extracted.text, &extracted.images)?;
    let count = index.insert_nodes(&nodes).await?;
    info!(nodes = count, "Index created");
    Ok(count)
}

/// Read queries line by line and write each answer.
///
/// Stops at end of input or on `quit` (any case). A failed query is logged
/// and the loop continues.
pub async fn run_query_loop<R, W>(
    engine: &MultimodalQueryEngine,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(output, "{}", QUERY_PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        match engine.answer(query).await {
            Ok(answer) => writeln!(output, "{}", answer.text)?,
            Err(e) => error!(query, error = %e, "Error processing query"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prism_core::traits::GenerationOptions;
    use prism_core::{
        Embedder, EmbeddingAction, FsImageStore, ImageReference, LlmResponse, Message,
        MultimodalLlm, PrismError, PrismResult, Tokenizer,
    };
    use prism_vector_stores::InMemoryVectorStore;
    use std::sync::{Arc, Mutex};

    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        fn count_tokens(&self, text: &str) -> PrismResult<usize> {
            Ok(text.split_whitespace().count())
        }
    }

    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, text: &str, _action: Option<EmbeddingAction>) -> PrismResult<Vec<f32>> {
            Ok(vec![1.0, text.len() as f32])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "length"
        }
    }

    /// Echoes the query back, or fails when the query mentions "fail".
    #[derive(Default)]
    struct EchoLlm {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl MultimodalLlm for EchoLlm {
        async fn chat(
            &self,
            messages: &[Message],
            _images: &[ImageReference],
            _options: Option<GenerationOptions>,
        ) -> PrismResult<LlmResponse> {
            *self.calls.lock().unwrap() += 1;
            let prompt = &messages[messages.len() - 1].content;
            if prompt.contains("fail") {
                return Err(PrismError::model_invocation("echo", "scripted failure"));
            }
            let query = prompt.lines().rev().find(|l| l.starts_with("Query:")).unwrap_or("");
            Ok(LlmResponse {
                content: Some(format!("echo {}", query)),
                usage: None,
            })
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn index() -> VectorIndex {
        VectorIndex::new(Arc::new(LengthEmbedder), Arc::new(InMemoryVectorStore::new("test")))
    }

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["prism"];
        argv.extend_from_slice(extra);
        argv.push("manual.pdf");
        Args::parse_from(argv)
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prism.toml");
        std::fs::write(&path, "storage_dir = \"/from/file\"\n[retrieval]\ntop_k = 4\n").unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let config = load_config(&args(&["--config", &path_arg, "--top-k", "3"])).unwrap();

        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.storage_dir, PathBuf::from("/from/file"));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prism.toml");
        std::fs::write(&path, "").unwrap();

        let path_arg = path.to_string_lossy().to_string();
        assert!(load_config(&args(&["--config", &path_arg, "--top-k", "0"])).is_err());
    }

    #[test]
    fn test_document_id() {
        assert_eq!(document_id(Path::new("docs/Robin_600.pdf")).unwrap(), "Robin_600");
        assert!(document_id(Path::new("/")).is_err());
    }

    #[tokio::test]
    async fn test_ensure_index_builds_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("manual.txt");
        std::fs::write(&document, "Mount the fixture. Set the address. Power it on.").unwrap();

        let builder = NodeBuilder::new(
            Arc::new(WordTokenizer),
            Arc::new(FsImageStore::new(dir.path().join("images"))),
            6,
            10,
        )
        .unwrap();
        let pipeline = ExtractionPipeline::with_defaults();
        let index = index();

        let built = ensure_index(&index, &pipeline, &builder, &document).await.unwrap();
        assert_eq!(built, 2);

        std::fs::remove_file(&document).unwrap();
        let reused = ensure_index(&index, &pipeline, &builder, &document).await.unwrap();
        assert_eq!(reused, 2);
    }

    #[tokio::test]
    async fn test_query_loop_answers_until_quit() {
        let llm = Arc::new(EchoLlm::default());
        let engine = MultimodalQueryEngine::new(Arc::new(index().as_retriever(3)), llm.clone());

        let input: &[u8] = b"what is dmx\n\nthis will fail\nQUIT\nnever asked\n";
        let mut output = Vec::new();
        run_query_loop(&engine, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(QUERY_PROMPT));
        assert!(output.contains("echo Query: what is dmx\n"));
        assert!(!output.contains("never asked"));
        assert_eq!(output.matches(QUERY_PROMPT).count(), 4);
        assert_eq!(*llm.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_loop_stops_at_end_of_input() {
        let engine = MultimodalQueryEngine::new(
            Arc::new(index().as_retriever(3)),
            Arc::new(EchoLlm::default()),
        );

        let input: &[u8] = b"first question";
        let mut output = Vec::new();
        run_query_loop(&engine, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches(QUERY_PROMPT).count(), 2);
        assert!(output.contains("echo Query: first question"));
    }
}
