//! Interactive RAG demo: index a few sample documents against a local
//! Ollama server, then answer questions from the terminal.
//!
//! ```bash
//! cargo run --example interactive_rag
//! ```
//!
//! Configuration is read from `ragmill.json` in the working directory
//! (override the path with `RAGMILL_CONFIG`); `OLLAMA_BASE_URL` repoints
//! the server. An empty input line exits.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ragmill::config::{AppConfig, CONFIG_PATH_VAR, DEFAULT_CONFIG_FILE};
use ragmill::ollama::{OllamaChatClient, OllamaChunkPlanner, OllamaEmbeddingProvider, build_client};
use ragmill::{Indexer, InMemoryVectorStore, RagService, Retriever};

const SAMPLES: &[(&str, &str)] = &[
    (
        "doc-ollama",
        "Ollama is a local LLM server that listens on http://localhost:11434 by default.\n\
         Run ollama pull llama3.1 to download the chat model, and ollama pull \
         nomic-embed-text to add the embedding model.\n\
         The HTTP API accepts requests to /api/chat and /api/embeddings.",
    ),
    (
        "doc-rag",
        "Retrieval Augmented Generation (RAG) combines retrieval and generation.\n\
         The process includes chunking text, computing embeddings, storing them in a \
         vector store, and searching via cosine similarity.\n\
         At query time, a TopK search with a score threshold selects context, which is \
         then passed to the LLM for the answer.",
    ),
    (
        "doc-demo",
        "This demo indexes a handful of sample documents at startup.\n\
         Ask a question about them on the prompt line.\n\
         Entering an empty line stops the program.",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let config = AppConfig::load(&config_path).await?;

    let ollama = config.ollama_options()?;
    let (top_k, threshold) = config.retrieval_params();

    let client = build_client()?;
    let embeddings = Arc::new(OllamaEmbeddingProvider::new(client.clone(), ollama.clone()));
    let planner = Arc::new(OllamaChunkPlanner::new(client.clone(), ollama.clone()));
    let chunker = config.build_chunker(planner)?;

    let store = Arc::new(InMemoryVectorStore::new());
    let indexer = Indexer::new(chunker, embeddings.clone(), store.clone());
    let retriever = Arc::new(Retriever::new(embeddings, store));
    let llm = Arc::new(OllamaChatClient::new(client, ollama.clone()));
    let rag = RagService::new(retriever, llm, top_k, threshold);

    let cancel = CancellationToken::new();

    println!("Indexing sample documents...");
    for (source_id, text) in SAMPLES {
        indexer.index_text(source_id, text, &cancel).await?;
    }

    println!(
        "Ready. Ollama: {}. TopK={top_k}, threshold={threshold}.",
        ollama.base_url
    );
    println!("Ask a question (empty line to exit).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(question) = lines.next_line().await? else {
            break;
        };

        if question.trim().is_empty() {
            break;
        }

        match rag.ask(&question, &cancel).await {
            Ok(answer) => println!("{answer}"),
            Err(err) => println!("Request failed: {err}"),
        }
    }

    Ok(())
}
