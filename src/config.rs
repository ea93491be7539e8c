//! JSON configuration surface for the pipeline.
//!
//! Every field is optional; absent fields resolve to the same defaults the
//! option structs carry. The demo loads `ragmill.json` from the working
//! directory (override with `RAGMILL_CONFIG`), and `OLLAMA_BASE_URL` beats
//! the configured base URL so deployments can repoint the server without
//! editing the file.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::chunking::semantic::{PlannerPromptOptions, SemanticChunkerOptions};
use crate::chunking::{
    AdaptiveChunkerOptions, AdaptiveSectionChunker, SemanticChunker, TextChunker, WordChunker,
};
use crate::chunking::semantic::ChunkPlanner;
use crate::ollama::OllamaOptions;
use crate::pipeline::Retriever;
use crate::types::RagError;

/// Environment variable naming an alternative config file path.
pub const CONFIG_PATH_VAR: &str = "RAGMILL_CONFIG";
/// Environment variable overriding the configured Ollama base URL.
pub const OLLAMA_URL_VAR: &str = "OLLAMA_BASE_URL";
/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ragmill.json";

/// Which segmentation strategy the pipeline uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingMode {
    Word,
    #[default]
    #[serde(alias = "adaptive-section")]
    Adaptive,
    Semantic,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OllamaConfig {
    pub base_url: Option<String>,
    pub embedding_model: Option<String>,
    pub chat_model: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: Option<usize>,
    pub threshold: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default)]
    pub mode: ChunkingMode,
    #[serde(default)]
    pub word: WordConfig,
    #[serde(default)]
    pub adaptive: AdaptiveConfig,
    #[serde(default)]
    pub semantic: SemanticConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WordConfig {
    pub window_words: Option<usize>,
    pub overlap_words: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AdaptiveConfig {
    pub target_words: Option<usize>,
    pub max_words: Option<usize>,
    pub min_words: Option<usize>,
    pub overlap_ratio: Option<f64>,
    pub overlap_sentences: Option<usize>,
    pub header_prefix_max_chars: Option<usize>,
    pub embedding_char_cap: Option<usize>,
    pub include_header_prefix: Option<bool>,
    pub header_prefix_template: Option<String>,
    pub trim_whitespace: Option<bool>,
    pub normalize_whitespace: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SemanticConfig {
    pub model: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_paragraphs_per_request: Option<usize>,
    pub max_paragraph_chars: Option<usize>,
    pub target_words: Option<usize>,
    pub min_words: Option<usize>,
    pub max_words: Option<usize>,
    pub overlap_sentences: Option<usize>,
    pub include_header_prefix: Option<bool>,
    pub header_prefix_template: Option<String>,
    pub fallback_on_error: Option<bool>,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PromptConfig {
    pub system: Option<String>,
    pub user_template: Option<Vec<String>>,
}

impl AppConfig {
    /// Loads configuration from `path`. A missing file resolves to the
    /// defaults; a present but unparseable file is a configuration error.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RagError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| RagError::Configuration(format!("failed to read config: {err}")))?;

        serde_json::from_str(&raw)
            .map_err(|err| RagError::Configuration(format!("failed to parse config: {err}")))
    }

    /// Resolves the Ollama connection options, honoring `OLLAMA_BASE_URL`.
    pub fn ollama_options(&self) -> Result<OllamaOptions, RagError> {
        let defaults = OllamaOptions::default();

        let base_url = std::env::var(OLLAMA_URL_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.ollama.base_url.clone());

        let base_url = match base_url {
            Some(raw) => Url::parse(&raw)
                .map_err(|err| RagError::Configuration(format!("invalid base_url '{raw}': {err}")))?,
            None => defaults.base_url,
        };

        Ok(OllamaOptions {
            base_url,
            embedding_model: self
                .ollama
                .embedding_model
                .clone()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.embedding_model),
            chat_model: self
                .ollama
                .chat_model
                .clone()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.chat_model),
        })
    }

    /// Retrieval parameters with defaults applied.
    pub fn retrieval_params(&self) -> (usize, f64) {
        (
            self.retrieval.top_k.unwrap_or(Retriever::DEFAULT_TOP_K),
            self.retrieval
                .threshold
                .unwrap_or(Retriever::DEFAULT_THRESHOLD),
        )
    }

    pub fn adaptive_options(&self) -> AdaptiveChunkerOptions {
        let cfg = &self.chunking.adaptive;
        let defaults = AdaptiveChunkerOptions::default();

        AdaptiveChunkerOptions {
            target_words: cfg.target_words.unwrap_or(defaults.target_words),
            max_words: cfg.max_words.unwrap_or(defaults.max_words),
            min_words: cfg.min_words.unwrap_or(defaults.min_words),
            overlap_ratio: cfg.overlap_ratio.unwrap_or(defaults.overlap_ratio),
            overlap_sentences: cfg.overlap_sentences.unwrap_or(defaults.overlap_sentences),
            header_prefix_max_chars: cfg
                .header_prefix_max_chars
                .unwrap_or(defaults.header_prefix_max_chars),
            embedding_char_cap: cfg.embedding_char_cap.unwrap_or(defaults.embedding_char_cap),
            include_header_prefix: cfg
                .include_header_prefix
                .unwrap_or(defaults.include_header_prefix),
            header_prefix_template: cfg
                .header_prefix_template
                .clone()
                .unwrap_or(defaults.header_prefix_template),
            trim_whitespace: cfg.trim_whitespace.unwrap_or(defaults.trim_whitespace),
            normalize_whitespace: cfg
                .normalize_whitespace
                .unwrap_or(defaults.normalize_whitespace),
        }
    }

    pub fn semantic_options(&self) -> SemanticChunkerOptions {
        let cfg = &self.chunking.semantic;
        let defaults = SemanticChunkerOptions::default();
        let default_prompt = PlannerPromptOptions::default();

        SemanticChunkerOptions {
            model: cfg.model.clone().unwrap_or(defaults.model),
            request_timeout: cfg
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            max_paragraphs_per_request: cfg
                .max_paragraphs_per_request
                .unwrap_or(defaults.max_paragraphs_per_request),
            max_paragraph_chars: cfg
                .max_paragraph_chars
                .unwrap_or(defaults.max_paragraph_chars),
            target_words: cfg.target_words.unwrap_or(defaults.target_words),
            min_words: cfg.min_words.unwrap_or(defaults.min_words),
            max_words: cfg.max_words.unwrap_or(defaults.max_words),
            overlap_sentences: cfg.overlap_sentences.unwrap_or(defaults.overlap_sentences),
            include_header_prefix: cfg
                .include_header_prefix
                .unwrap_or(defaults.include_header_prefix),
            header_prefix_template: cfg
                .header_prefix_template
                .clone()
                .unwrap_or(defaults.header_prefix_template),
            fallback_on_error: cfg.fallback_on_error.unwrap_or(defaults.fallback_on_error),
            prompt: PlannerPromptOptions {
                system: cfg.prompt_system().unwrap_or(default_prompt.system),
                user_template: cfg.prompt_template().unwrap_or(default_prompt.user_template),
            },
        }
    }

    /// Builds the chunker selected by `chunking.mode`. The planner is only
    /// used in semantic mode.
    pub fn build_chunker(
        &self,
        planner: Arc<dyn ChunkPlanner>,
    ) -> Result<Arc<dyn TextChunker>, RagError> {
        match self.chunking.mode {
            ChunkingMode::Word => {
                let cfg = &self.chunking.word;
                let chunker = WordChunker::new(
                    cfg.window_words.unwrap_or(WordChunker::DEFAULT_WINDOW_WORDS),
                    cfg.overlap_words
                        .unwrap_or(WordChunker::DEFAULT_OVERLAP_WORDS),
                )?;
                Ok(Arc::new(chunker))
            }
            ChunkingMode::Adaptive => {
                Ok(Arc::new(AdaptiveSectionChunker::new(self.adaptive_options())?))
            }
            ChunkingMode::Semantic => Ok(Arc::new(SemanticChunker::new(
                planner,
                self.semantic_options(),
            )?)),
        }
    }
}

impl SemanticConfig {
    fn prompt_system(&self) -> Option<String> {
        self.prompt
            .system
            .clone()
            .filter(|value| !value.trim().is_empty())
    }

    fn prompt_template(&self) -> Option<Vec<String>> {
        self.prompt
            .user_template
            .clone()
            .filter(|lines| !lines.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_resolves_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.chunking.mode, ChunkingMode::Adaptive);
        assert_eq!(config.retrieval_params(), (5, 0.72));

        let adaptive = config.adaptive_options();
        assert_eq!(adaptive.target_words, 700);
        assert_eq!(adaptive.max_words, 1100);
    }

    #[test]
    fn partial_config_merges_field_by_field() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "retrieval": { "top_k": 3 },
                "chunking": {
                    "mode": "semantic",
                    "semantic": { "target_words": 50, "timeout_ms": 1000 }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.chunking.mode, ChunkingMode::Semantic);
        assert_eq!(config.retrieval_params(), (3, 0.72));

        let semantic = config.semantic_options();
        assert_eq!(semantic.target_words, 50);
        assert_eq!(semantic.max_words, 1100);
        assert_eq!(semantic.request_timeout, Duration::from_millis(1000));
        assert!(!semantic.prompt.user_template.is_empty());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let result: Result<AppConfig, _> =
            serde_json::from_str(r#"{ "chunking": { "mode": "mystery" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn adaptive_alias_is_accepted() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "chunking": { "mode": "adaptive-section" } }"#).unwrap();
        assert_eq!(config.chunking.mode, ChunkingMode::Adaptive);
    }
}
