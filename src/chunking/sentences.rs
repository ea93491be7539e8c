//! Sentence splitting on terminal punctuation.

const DELIMITERS: [char; 3] = ['.', '?', '!'];

/// Splits text into sentences, cutting after `.`, `?`, or `!`.
///
/// Each emitted sentence is trimmed; whitespace-only fragments are dropped.
/// Text without terminal punctuation comes back as a single sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut buffer = String::new();

    for ch in text.chars() {
        buffer.push(ch);
        if DELIMITERS.contains(&ch) {
            emit(&mut buffer, &mut sentences);
        }
    }

    emit(&mut buffer, &mut sentences);
    sentences
}

fn emit(buffer: &mut String, sentences: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let candidate = buffer.trim();
    if !candidate.is_empty() {
        sentences.push(candidate.to_string());
    }
    buffer.clear();
}
