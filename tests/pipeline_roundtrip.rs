//! End-to-end pipeline tests with mock collaborators: index, retrieve, ask.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use ragmill::chunking::WordChunker;
use ragmill::embeddings::{EmbeddingProvider, MockEmbeddingProvider};
use ragmill::llm::LlmClient;
use ragmill::pipeline::rag::{EMPTY_QUESTION_ANSWER, NO_CONTEXT_ANSWER};
use ragmill::types::RagError;
use ragmill::{Indexer, InMemoryVectorStore, RagService, Retriever};

/// Embedder that fails once a call budget is exhausted.
struct FailingEmbeddings {
    inner: MockEmbeddingProvider,
    budget: AtomicUsize,
}

impl FailingEmbeddings {
    fn new(budget: usize) -> Self {
        Self {
            inner: MockEmbeddingProvider::new(),
            budget: AtomicUsize::new(budget),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        if self.budget.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |b| b.checked_sub(1))
            .is_err()
        {
            return Err(RagError::Embedding("backend unavailable".into()));
        }
        self.inner.embed(text).await
    }
}

/// LLM stub that echoes the prompt back, so tests can inspect it.
struct EchoLlm {
    calls: AtomicUsize,
}

impl EchoLlm {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmClient for EchoLlm {
    async fn ask(&self, prompt: &str) -> Result<String, RagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompt.to_string())
    }
}

fn pipeline() -> (Indexer, Arc<Retriever>, Arc<InMemoryVectorStore>) {
    let chunker = Arc::new(WordChunker::new(50, 0).unwrap());
    let embeddings = Arc::new(MockEmbeddingProvider::new());
    let store = Arc::new(InMemoryVectorStore::new());
    let indexer = Indexer::new(chunker, embeddings.clone(), store.clone());
    let retriever = Arc::new(Retriever::new(embeddings, store.clone()));
    (indexer, retriever, store)
}

#[tokio::test]
async fn index_then_retrieve_finds_the_exact_chunk() {
    let (indexer, retriever, _store) = pipeline();
    let cancel = CancellationToken::new();

    indexer
        .index_text("doc-a", "the quick brown fox", &cancel)
        .await
        .unwrap();
    indexer
        .index_text("doc-b", "an entirely different subject", &cancel)
        .await
        .unwrap();

    let results = retriever
        .retrieve("the quick brown fox", 5, 0.99, &cancel)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source_id, "doc-a");
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn blank_query_or_zero_top_k_return_empty() {
    let (indexer, retriever, _store) = pipeline();
    let cancel = CancellationToken::new();

    indexer
        .index_text("doc", "some indexed content", &cancel)
        .await
        .unwrap();

    assert!(retriever.retrieve("  ", 5, 0.0, &cancel).await.unwrap().is_empty());
    assert!(
        retriever
            .retrieve("some indexed content", 0, 0.0, &cancel)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn blank_source_id_is_rejected() {
    let (indexer, _retriever, store) = pipeline();
    let cancel = CancellationToken::new();

    let err = indexer.index_text("  ", "content", &cancel).await.unwrap_err();
    assert!(matches!(err, RagError::Configuration(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn blank_text_is_a_no_op() {
    let (indexer, _retriever, store) = pipeline();
    let cancel = CancellationToken::new();

    indexer.index_text("doc", "   ", &cancel).await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn embedding_failure_leaves_the_store_untouched() {
    let chunker = Arc::new(WordChunker::new(3, 0).unwrap());
    let embeddings = Arc::new(FailingEmbeddings::new(2));
    let store = Arc::new(InMemoryVectorStore::new());
    let indexer = Indexer::new(chunker, embeddings, store.clone());
    let cancel = CancellationToken::new();

    // Four chunks of three words; the third embedding call fails.
    let text = "w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11 w12";
    let err = indexer.index_text("doc", text, &cancel).await.unwrap_err();

    assert!(matches!(err, RagError::Embedding(_)));
    assert!(store.is_empty(), "no partial document may be stored");
}

#[tokio::test]
async fn cancelled_indexing_stores_nothing() {
    let (indexer, _retriever, store) = pipeline();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = indexer
        .index_text("doc", "content to index", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::Cancelled));
    assert!(store.is_empty());
}

#[tokio::test]
async fn reindexing_a_source_replaces_its_records() {
    let (indexer, retriever, store) = pipeline();
    let cancel = CancellationToken::new();

    indexer
        .index_text("doc", "original wording of the text", &cancel)
        .await
        .unwrap();
    indexer
        .index_text("doc", "revised wording of the text", &cancel)
        .await
        .unwrap();

    assert_eq!(store.len(), 1, "same id must be replaced, not duplicated");

    let results = retriever
        .retrieve("revised wording of the text", 1, 0.99, &cancel)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].text, "revised wording of the text");
}

#[tokio::test]
async fn empty_question_short_circuits_without_collaborators() {
    let (_indexer, retriever, _store) = pipeline();
    let llm = Arc::new(EchoLlm::new());
    let rag = RagService::new(retriever, llm.clone(), 5, 0.72);
    let cancel = CancellationToken::new();

    let answer = rag.ask("   ", &cancel).await.unwrap();

    assert_eq!(answer, EMPTY_QUESTION_ANSWER);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn no_context_short_circuits_the_llm() {
    let (_indexer, retriever, _store) = pipeline();
    let llm = Arc::new(EchoLlm::new());
    let rag = RagService::new(retriever, llm.clone(), 5, 0.72);
    let cancel = CancellationToken::new();

    // Nothing indexed, so nothing can clear the threshold.
    let answer = rag.ask("anything at all", &cancel).await.unwrap();

    assert_eq!(answer, NO_CONTEXT_ANSWER);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn prompt_contains_context_scores_and_instruction() {
    let (indexer, retriever, _store) = pipeline();
    let llm = Arc::new(EchoLlm::new());
    let rag = RagService::new(retriever, llm.clone(), 5, 0.9);
    let cancel = CancellationToken::new();

    indexer
        .index_text("doc", "cosine similarity ranks vectors", &cancel)
        .await
        .unwrap();

    let prompt = rag
        .ask("cosine similarity ranks vectors", &cancel)
        .await
        .unwrap();

    assert!(prompt.contains("[score:"));
    assert!(prompt.contains("cosine similarity ranks vectors"));
    assert!(prompt.contains("I don't know"));
    assert!(prompt.contains("Question:"));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}
