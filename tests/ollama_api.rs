//! HTTP-level tests for the Ollama collaborators, using httpmock.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use url::Url;

use ragmill::chunking::semantic::{ChunkPlanner, Paragraph, SemanticChunkerOptions};
use ragmill::embeddings::EmbeddingProvider;
use ragmill::llm::LlmClient;
use ragmill::ollama::{
    OllamaChatClient, OllamaChunkPlanner, OllamaEmbeddingProvider, OllamaOptions, build_client,
};
use ragmill::types::RagError;

fn options_for(server: &MockServer) -> OllamaOptions {
    OllamaOptions {
        base_url: Url::parse(&server.base_url()).unwrap(),
        ..OllamaOptions::default()
    }
}

fn paragraph(index: usize, text: &str) -> Paragraph {
    Paragraph {
        index,
        text: text.to_string(),
        heading_path: String::new(),
        is_heading: false,
    }
}

#[tokio::test]
async fn embedder_returns_the_backend_vector() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/embeddings")
                .json_body_partial(r#"{ "model": "nomic-embed-text" }"#);
            then.status(200)
                .json_body(json!({ "embedding": [0.25, -0.5, 1.0] }));
        })
        .await;

    let provider = OllamaEmbeddingProvider::new(build_client().unwrap(), options_for(&server));
    let vector = provider.embed("some text").await.unwrap();

    assert_eq!(vector, vec![0.25, -0.5, 1.0]);
    mock.assert_async().await;
}

#[tokio::test]
async fn embedder_rejects_empty_embedding() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embeddings");
            then.status(200).json_body(json!({ "embedding": [] }));
        })
        .await;

    let provider = OllamaEmbeddingProvider::new(build_client().unwrap(), options_for(&server));
    let err = provider.embed("some text").await.unwrap_err();

    assert!(matches!(err, RagError::Embedding(_)));
}

#[tokio::test]
async fn embedder_surfaces_backend_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embeddings");
            then.status(500);
        })
        .await;

    let provider = OllamaEmbeddingProvider::new(build_client().unwrap(), options_for(&server));
    let err = provider.embed("some text").await.unwrap_err();

    assert!(matches!(err, RagError::Embedding(_)));
}

#[tokio::test]
async fn embedder_rejects_blank_text_locally() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embeddings");
            then.status(200).json_body(json!({ "embedding": [1.0] }));
        })
        .await;

    let provider = OllamaEmbeddingProvider::new(build_client().unwrap(), options_for(&server));
    let err = provider.embed("   ").await.unwrap_err();

    assert!(matches!(err, RagError::Embedding(_)));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn chat_client_returns_answer_content() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat")
                .json_body_partial(r#"{ "model": "llama3.1", "stream": false }"#);
            then.status(200)
                .json_body(json!({ "message": { "role": "assistant", "content": "the answer" } }));
        })
        .await;

    let client = OllamaChatClient::new(build_client().unwrap(), options_for(&server));
    let answer = client.ask("what is the answer?").await.unwrap();

    assert_eq!(answer, "the answer");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_client_skips_request_for_blank_prompt() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({ "message": { "content": "unused" } }));
        })
        .await;

    let client = OllamaChatClient::new(build_client().unwrap(), options_for(&server));
    let answer = client.ask("  ").await.unwrap();

    assert_eq!(answer, "");
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn planner_parses_the_documented_schema() {
    let server = MockServer::start_async().await;
    let plan_json =
        r#"{ "chunks": [ { "paragraphs": [0, 1], "title": "intro" }, { "paragraphs": [2] } ] }"#;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200)
                .json_body(json!({ "message": { "content": plan_json } }));
        })
        .await;

    let planner = OllamaChunkPlanner::new(build_client().unwrap(), options_for(&server));
    let paragraphs = vec![
        paragraph(0, "first"),
        paragraph(1, "second"),
        paragraph(2, "third"),
    ];

    let plan = planner
        .plan(&paragraphs, &SemanticChunkerOptions::default())
        .await
        .unwrap();

    assert_eq!(plan.chunks.len(), 2);
    assert_eq!(plan.chunks[0].paragraphs, vec![0, 1]);
    assert_eq!(plan.chunks[0].title.as_deref(), Some("intro"));
    mock.assert_async().await;
}

#[tokio::test]
async fn planner_rejects_unparseable_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200)
                .json_body(json!({ "message": { "content": "sorry, no JSON today" } }));
        })
        .await;

    let planner = OllamaChunkPlanner::new(build_client().unwrap(), options_for(&server));
    let err = planner
        .plan(&[paragraph(0, "text")], &SemanticChunkerOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::Planning(_)));
}

#[tokio::test]
async fn planner_rejects_empty_chunk_list() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200)
                .json_body(json!({ "message": { "content": "{ \"chunks\": [] }" } }));
        })
        .await;

    let planner = OllamaChunkPlanner::new(build_client().unwrap(), options_for(&server));
    let err = planner
        .plan(&[paragraph(0, "text")], &SemanticChunkerOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::Planning(_)));
}

#[tokio::test]
async fn planner_times_out_as_a_planning_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "message": { "content": "{ \"chunks\": [ { \"paragraphs\": [0] } ] }" } }));
        })
        .await;

    let planner = OllamaChunkPlanner::new(build_client().unwrap(), options_for(&server));
    let options = SemanticChunkerOptions {
        request_timeout: Duration::from_millis(50),
        ..SemanticChunkerOptions::default()
    };

    let err = planner
        .plan(&[paragraph(0, "text")], &options)
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::Planning(_)));
}

#[tokio::test]
async fn planner_refuses_over_limit_paragraph_counts_locally() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200)
                .json_body(json!({ "message": { "content": "{ \"chunks\": [] }" } }));
        })
        .await;

    let planner = OllamaChunkPlanner::new(build_client().unwrap(), options_for(&server));
    let options = SemanticChunkerOptions {
        max_paragraphs_per_request: 1,
        ..SemanticChunkerOptions::default()
    };
    let paragraphs = vec![paragraph(0, "one"), paragraph(1, "two")];

    let err = planner.plan(&paragraphs, &options).await.unwrap_err();

    assert!(matches!(err, RagError::Planning(_)));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn planner_prompt_includes_size_targets_and_paragraphs() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat")
                .body_contains("Target chunk size: 700 words")
                .body_contains("p0:");
            then.status(200).json_body(
                json!({ "message": { "content": "{ \"chunks\": [ { \"paragraphs\": [0] } ] }" } }),
            );
        })
        .await;

    let planner = OllamaChunkPlanner::new(build_client().unwrap(), options_for(&server));
    let plan = planner
        .plan(
            &[paragraph(0, "only paragraph")],
            &SemanticChunkerOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(plan.chunks.len(), 1);
    mock.assert_async().await;
}
