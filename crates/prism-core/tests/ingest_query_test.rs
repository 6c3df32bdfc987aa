//! Integration tests for the ingest-then-query flow.
//!
//! Builds nodes from document text and images, indexes them, and answers a
//! query through the multimodal engine with deterministic local fakes.

use async_trait::async_trait;
use prism_core::traits::{GenerationOptions, VectorRecord, VectorSearchResult};
use prism_core::{
    Embedder, EmbeddingAction, FsImageStore, ImageFormat, ImageReference, LlmResponse, Message,
    MultimodalLlm, MultimodalQueryEngine, NodeBuilder, PrismResult, SourceImage, Tokenizer,
    VectorIndex, VectorStore,
};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, text: &str) -> PrismResult<usize> {
        Ok(text.split_whitespace().count())
    }
}

/// Counts a few keywords so related text scores higher.
struct KeywordEmbedder;

const KEYWORDS: [&str; 4] = ["fuse", "dmx", "lamp", "fan"];

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str, _action: Option<EmbeddingAction>) -> PrismResult<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect())
    }

    fn dimension(&self) -> usize {
        KEYWORDS.len()
    }

    fn model_name(&self) -> &str {
        "keywords"
    }
}

#[derive(Default)]
struct DotStore {
    records: RwLock<Vec<VectorRecord>>,
}

#[async_trait]
impl VectorStore for DotStore {
    async fn insert(&self, records: Vec<VectorRecord>) -> PrismResult<()> {
        self.records.write().await.extend(records);
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> PrismResult<Vec<VectorSearchResult>> {
        let records = self.records.read().await;
        let mut results: Vec<_> = records
            .iter()
            .map(|r| VectorSearchResult {
                id: r.id.clone(),
                score: r.vector.iter().zip(query).map(|(a, b)| a * b).sum(),
                payload: r.payload.clone(),
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        Ok(results)
    }

    async fn get(&self, id: &str) -> PrismResult<Option<VectorRecord>> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn count(&self) -> PrismResult<usize> {
        Ok(self.records.read().await.len())
    }

    async fn reset(&self) -> PrismResult<()> {
        self.records.write().await.clear();
        Ok(())
    }

    fn collection_name(&self) -> &str {
        "vector_index"
    }
}

#[derive(Default)]
struct RecordingLlm {
    images: Mutex<Vec<ImageReference>>,
    prompt: Mutex<String>,
}

#[async_trait]
impl MultimodalLlm for RecordingLlm {
    async fn chat(
        &self,
        messages: &[Message],
        images: &[ImageReference],
        _options: Option<GenerationOptions>,
    ) -> PrismResult<LlmResponse> {
        *self.images.lock().unwrap() = images.to_vec();
        *self.prompt.lock().unwrap() = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(LlmResponse::text("Replace the 10 A fuse."))
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

fn jpeg(tag: u8) -> SourceImage {
    SourceImage::new(
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', tag],
        ImageFormat::Jpeg,
    )
    .with_page(1)
}

#[tokio::test]
async fn test_ingest_then_answer() {
    let image_dir = tempfile::tempdir().unwrap();
    let builder = NodeBuilder::new(
        Arc::new(WordTokenizer),
        Arc::new(FsImageStore::new(image_dir.path())),
        8,
        10,
    )
    .unwrap();

    let text = "The fixture uses a 10 A fuse on the rear panel. \
                Set the DMX start address from the menu. \
                The lamp is an LED engine with a rated life of 50000 hours. \
                The fan runs quietly in studio mode";
    let nodes = builder
        .build_nodes("robin600", text, &[jpeg(0), jpeg(1)])
        .unwrap();

    assert_eq!(nodes.len(), 4);
    assert!(nodes[0].has_image());
    assert!(nodes[1].has_image());
    assert!(!nodes[2].has_image());
    assert!(image_dir.path().join("robin600").join("image_0.jpg").exists());
    assert!(image_dir.path().join("robin600").join("image_1.jpg").exists());

    let index = VectorIndex::new(Arc::new(KeywordEmbedder), Arc::new(DotStore::default()));
    assert!(index.is_empty().await.unwrap());
    assert_eq!(index.insert_nodes(&nodes).await.unwrap(), 4);

    let llm = Arc::new(RecordingLlm::default());
    let engine = MultimodalQueryEngine::new(Arc::new(index.as_retriever(1)), llm.clone());

    let result = engine.answer("Which fuse does it take?").await.unwrap();

    assert_eq!(result.text, "Replace the 10 A fuse.");
    assert_eq!(result.source_nodes.len(), 1);
    assert_eq!(result.source_nodes[0].node, nodes[0]);

    let images = llm.images.lock().unwrap().clone();
    assert_eq!(images, vec![nodes[0].image_reference.clone().unwrap()]);

    let prompt = llm.prompt.lock().unwrap().clone();
    assert!(prompt.contains("The fixture uses a 10 A fuse on the rear panel"));
    assert!(prompt.contains("Query: Which fuse does it take?"));
}

#[tokio::test]
async fn test_text_only_document() {
    let image_dir = tempfile::tempdir().unwrap();
    let builder = NodeBuilder::new(
        Arc::new(WordTokenizer),
        Arc::new(FsImageStore::new(image_dir.path())),
        100,
        10,
    )
    .unwrap();

    let nodes = builder
        .build_nodes("notes", "Check the fan. Clean the lamp", &[])
        .unwrap();
    assert_eq!(nodes.len(), 1);

    let index = VectorIndex::new(Arc::new(KeywordEmbedder), Arc::new(DotStore::default()));
    index.insert_nodes(&nodes).await.unwrap();

    let llm = Arc::new(RecordingLlm::default());
    let engine = MultimodalQueryEngine::new(Arc::new(index.as_retriever(9)), llm.clone());
    let result = engine.answer("fan?").await.unwrap();

    assert_eq!(result.source_nodes.len(), 1);
    assert!(llm.images.lock().unwrap().is_empty());
}
