//! ```text
//! Raw text ──► chunking::{word, adaptive, semantic} ──► TextChunk
//!                               │
//!                               └─► semantic planning collaborator
//!                                   (validated, heuristic fallback)
//!
//! TextChunk ──► pipeline::Indexer ──► embeddings ──► stores::VectorStore
//!
//! Query ──► pipeline::Retriever ──► ranked ScoredChunk
//!        └─► pipeline::RagService ──► context prompt ──► llm ──► answer
//! ```
//!
//! Chunking, embedding, and vector retrieval core for retrieval-augmented
//! generation. The chunkers, similarity store, and orchestration services
//! live here; embedding, answering, and planning backends are collaborators
//! behind narrow traits, with Ollama-backed implementations in [`ollama`].

pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod llm;
pub mod ollama;
pub mod pipeline;
pub mod similarity;
pub mod stores;
pub mod types;

pub use chunking::{
    AdaptiveChunkerOptions, AdaptiveSectionChunker, SemanticChunker, SemanticChunkerOptions,
    TextChunker, WordChunker,
};
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider};
pub use llm::LlmClient;
pub use pipeline::{Indexer, RagService, Retriever};
pub use stores::{InMemoryVectorStore, VectorStore};
pub use types::{RagError, ScoredChunk, TextChunk, VectorRecord};
