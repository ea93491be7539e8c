//! Top-level orchestration: indexing, retrieval, and answering.
//!
//! Data flows one way: raw text → chunks → embedded records → store;
//! query → embedding → ranked records → prompt → answer.

pub mod indexer;
pub mod rag;
pub mod retriever;

pub use indexer::Indexer;
pub use rag::RagService;
pub use retriever::Retriever;
