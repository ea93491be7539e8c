//! Section- and paragraph-aware chunking toward a target word count.
//!
//! Documents are parsed into heading-keyed sections, sections into
//! paragraphs, and paragraphs are greedily accumulated into chunk bodies
//! bounded by `max_words`. Oversized paragraphs are split recursively —
//! sentences first, fixed word windows as the last resort. Consecutive
//! chunks share overlap text carried across the whole document.

pub mod sections;

use std::collections::VecDeque;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::sentences::split_sentences;
use super::{TextChunker, count_words};
use crate::types::{RagError, TextChunk};

pub use sections::{Section, SectionParser};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Configuration for [`AdaptiveSectionChunker`].
#[derive(Clone, Debug)]
pub struct AdaptiveChunkerOptions {
    /// Word count a chunk body aims for.
    pub target_words: usize,
    /// Hard word ceiling for a chunk body. Must be `>= target_words`.
    pub max_words: usize,
    /// A trailing body below this count merges into its predecessor.
    pub min_words: usize,
    /// Trailing fraction of the previous body carried as overlap when
    /// sentence-based overlap is disabled.
    pub overlap_ratio: f64,
    /// Number of trailing sentences carried as overlap. Takes priority over
    /// `overlap_ratio` whenever nonzero; the two are never combined.
    pub overlap_sentences: usize,
    /// Hard character cap for the rendered header prefix.
    pub header_prefix_max_chars: usize,
    /// Character cap applied to the final chunk text. `0` means unlimited.
    pub embedding_char_cap: usize,
    /// Whether to prepend the heading path to each chunk.
    pub include_header_prefix: bool,
    /// Header prefix template; `{path}` is replaced with the joined path.
    pub header_prefix_template: String,
    /// Trim surrounding whitespace from each line.
    pub trim_whitespace: bool,
    /// Collapse runs of internal whitespace to single spaces.
    pub normalize_whitespace: bool,
}

impl Default for AdaptiveChunkerOptions {
    fn default() -> Self {
        Self {
            target_words: 700,
            max_words: 1100,
            min_words: 200,
            overlap_ratio: 0.15,
            overlap_sentences: 2,
            header_prefix_max_chars: 300,
            embedding_char_cap: 0,
            include_header_prefix: true,
            header_prefix_template: "Section: {path}\n\n".to_string(),
            trim_whitespace: true,
            normalize_whitespace: true,
        }
    }
}

impl AdaptiveChunkerOptions {
    fn validate(self) -> Result<Self, RagError> {
        if self.target_words == 0 {
            return Err(RagError::Configuration(
                "target_words must be positive".into(),
            ));
        }
        if self.max_words < self.target_words {
            return Err(RagError::Configuration(
                "max_words must be greater than or equal to target_words".into(),
            ));
        }
        if self.overlap_ratio < 0.0 {
            return Err(RagError::Configuration(
                "overlap_ratio must be non-negative".into(),
            ));
        }
        if self.header_prefix_max_chars == 0 {
            return Err(RagError::Configuration(
                "header_prefix_max_chars must be positive".into(),
            ));
        }
        Ok(self)
    }
}

/// Adaptive chunker that groups text by sections and accumulates paragraphs
/// toward target sizes.
#[derive(Clone, Debug)]
pub struct AdaptiveSectionChunker {
    options: AdaptiveChunkerOptions,
    section_parser: SectionParser,
}

impl AdaptiveSectionChunker {
    pub fn new(options: AdaptiveChunkerOptions) -> Result<Self, RagError> {
        let options = options.validate()?;
        let section_parser = SectionParser::new(options.trim_whitespace);
        Ok(Self {
            options,
            section_parser,
        })
    }

    pub fn options(&self) -> &AdaptiveChunkerOptions {
        &self.options
    }

    fn paragraphs(&self, content: &str) -> Vec<String> {
        let mut result = Vec::new();
        if content.trim().is_empty() {
            return result;
        }

        let normalized = content.replace("\r\n", "\n");
        let mut buffer: Vec<String> = Vec::new();

        for line in normalized.split('\n') {
            let mut working = if self.options.trim_whitespace {
                line.trim().to_string()
            } else {
                line.to_string()
            };

            if self.options.normalize_whitespace {
                working = WHITESPACE.replace_all(&working, " ").into_owned();
            }

            if working.trim().is_empty() {
                if !buffer.is_empty() {
                    result.push(buffer.join(" "));
                    buffer.clear();
                }
                continue;
            }

            buffer.push(working);
        }

        if !buffer.is_empty() {
            result.push(buffer.join(" "));
        }

        result
    }

    /// Accumulates paragraphs into bodies of at most `max_words`, closing a
    /// body once it reaches `target_words` or the next paragraph would
    /// overflow it. Oversized paragraphs are split and their pieces pushed
    /// back onto the front of the pending queue.
    fn build_bodies(&self, paragraphs: Vec<String>) -> Vec<String> {
        let mut queue: VecDeque<String> = paragraphs.into();
        let mut bodies = Vec::new();
        let mut parts: Vec<String> = Vec::new();
        let mut words = 0usize;

        while let Some(paragraph) = queue.pop_front() {
            let paragraph_words = count_words(&paragraph);

            if paragraph_words > self.options.max_words {
                for piece in self.split_oversized(&paragraph).into_iter().rev() {
                    queue.push_front(piece);
                }
                continue;
            }

            if words + paragraph_words > self.options.max_words && !parts.is_empty() {
                bodies.push(parts.join("\n\n"));
                parts.clear();
                words = 0;
            }

            words += paragraph_words;
            parts.push(paragraph);

            if words >= self.options.target_words {
                bodies.push(parts.join("\n\n"));
                parts.clear();
                words = 0;
            }
        }

        if !parts.is_empty() {
            bodies.push(parts.join("\n\n"));
        }

        bodies
    }

    /// Splits an oversized paragraph on sentence boundaries, re-merging
    /// sentences up to `max_words`; a single sentence still over the limit
    /// falls back to fixed word windows.
    fn split_oversized(&self, paragraph: &str) -> Vec<String> {
        let sentences = split_sentences(paragraph);
        if sentences.is_empty() {
            return self.split_by_words(paragraph);
        }

        let mut pieces = Vec::new();
        let mut buffer: Vec<String> = Vec::new();
        let mut words = 0usize;

        for sentence in sentences {
            let sentence_words = count_words(&sentence);

            if sentence_words > self.options.max_words {
                if !buffer.is_empty() {
                    pieces.push(buffer.join(" "));
                    buffer.clear();
                    words = 0;
                }
                pieces.extend(self.split_by_words(&sentence));
                continue;
            }

            if words + sentence_words > self.options.max_words && !buffer.is_empty() {
                pieces.push(buffer.join(" "));
                buffer.clear();
                words = 0;
            }

            words += sentence_words;
            buffer.push(sentence);
        }

        if !buffer.is_empty() {
            pieces.push(buffer.join(" "));
        }

        pieces
    }

    fn split_by_words(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        words
            .chunks(self.options.max_words)
            .map(|window| window.join(" "))
            .collect()
    }

    fn build_chunk_text(&self, section_path: &[String], body: &str) -> String {
        let mut parts: Vec<String> = Vec::new();

        if self.options.include_header_prefix && !section_path.is_empty() {
            let path = section_path.join(" > ");
            let prefix = self.options.header_prefix_template.replace("{path}", &path);
            let prefix = truncate_chars(&prefix, self.options.header_prefix_max_chars);
            parts.push(prefix.trim_end().to_string());
        }

        parts.push(body.trim().to_string());

        parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Prepends overlap, truncating it from its head so the combined body
    /// never exceeds `max_words`.
    fn combine_with_overlap(&self, body: &str, overlap: Option<&str>) -> String {
        let Some(overlap) = overlap.filter(|o| !o.trim().is_empty()) else {
            return body.to_string();
        };

        let body_words = count_words(body);
        let overlap_words: Vec<&str> = overlap.split_whitespace().collect();

        if body_words + overlap_words.len() <= self.options.max_words {
            return format!("{overlap}\n\n{body}");
        }

        let allowed = self.options.max_words.saturating_sub(body_words);
        if allowed == 0 {
            return body.to_string();
        }

        let kept = &overlap_words[overlap_words.len() - allowed.min(overlap_words.len())..];
        format!("{}\n\n{body}", kept.join(" "))
    }

    fn build_overlap(&self, body: &str) -> Option<String> {
        if body.trim().is_empty() {
            return None;
        }

        if self.options.overlap_sentences > 0 {
            let sentences = split_sentences(body);
            if sentences.is_empty() {
                return None;
            }
            let take = self.options.overlap_sentences.min(sentences.len());
            let overlap = sentences[sentences.len() - take..].join(" ");
            let overlap = overlap.trim();
            return (!overlap.is_empty()).then(|| overlap.to_string());
        }

        if self.options.overlap_ratio > 0.0 {
            let words: Vec<&str> = body.split_whitespace().collect();
            if words.is_empty() {
                return None;
            }
            let ratio = self.options.overlap_ratio.min(1.0);
            let take = ((words.len() as f64 * ratio).ceil() as usize).max(1);
            let take = take.min(words.len());
            let overlap = words[words.len() - take..].join(" ");
            return (!overlap.is_empty()).then_some(overlap);
        }

        None
    }

    fn cap_for_embedding(&self, text: String) -> String {
        if self.options.embedding_char_cap == 0 {
            return text;
        }
        truncate_chars(&text, self.options.embedding_char_cap)
    }
}

#[async_trait]
impl TextChunker for AdaptiveSectionChunker {
    async fn chunk(&self, source_id: &str, text: &str) -> Result<Vec<TextChunk>, RagError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();
        let mut chunk_index = 0usize;
        // Overlap carries across section boundaries within a document.
        let mut overlap: Option<String> = None;

        for section in self.section_parser.parse(text) {
            let paragraphs = self.paragraphs(&section.content);
            if paragraphs.is_empty() {
                continue;
            }

            let mut bodies = self.build_bodies(paragraphs);

            // Never leave an undersized trailing body when alternatives exist.
            if bodies.len() > 1 && count_words(&bodies[bodies.len() - 1]) < self.options.min_words {
                if let (Some(tail), Some(prev)) = (bodies.pop(), bodies.last_mut()) {
                    if prev.trim().is_empty() {
                        *prev = tail;
                    } else if !tail.trim().is_empty() {
                        *prev = format!("{prev}\n\n{tail}");
                    }
                }
            }

            for body in bodies {
                let body_with_overlap = self.combine_with_overlap(&body, overlap.as_deref());
                let final_text = self.build_chunk_text(&section.path, &body_with_overlap);
                let final_text = self.cap_for_embedding(final_text);

                chunks.push(TextChunk::new(
                    format!("{source_id}::chunk::{chunk_index:05}"),
                    source_id,
                    chunk_index,
                    final_text,
                ));

                overlap = self.build_overlap(&body);
                chunk_index += 1;
            }
        }

        tracing::debug!(
            source_id,
            chunk_count = chunks.len(),
            "adaptive chunking complete"
        );

        Ok(chunks)
    }
}

/// Hard-truncates to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
