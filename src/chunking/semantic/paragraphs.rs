//! Paragraph splitting with heading tagging for planner-driven chunking.

const MAX_HEADING_CHARS: usize = 80;

/// An ordered paragraph, tagged when it looks like a heading and carrying
/// the heading path in force at its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    /// Zero-based position in document order.
    pub index: usize,
    pub text: String,
    /// Most recent heading context, already joined for display.
    pub heading_path: String,
    pub is_heading: bool,
}

/// Splits text into paragraphs on blank lines.
///
/// A short paragraph that starts with `#`, ends with a colon, or is mostly
/// uppercase is tagged as a heading and becomes the heading context for the
/// paragraphs that follow it.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let normalized = text.replace("\r\n", "\n");

    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut heading_stack: Vec<String> = Vec::new();

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            flush(&mut buffer, &mut heading_stack, &mut paragraphs);
            continue;
        }
        buffer.push(line);
    }

    flush(&mut buffer, &mut heading_stack, &mut paragraphs);
    paragraphs
}

fn flush(buffer: &mut Vec<&str>, heading_stack: &mut Vec<String>, paragraphs: &mut Vec<Paragraph>) {
    if buffer.is_empty() {
        return;
    }

    let text = buffer.join("\n").trim().to_string();
    buffer.clear();

    let is_heading = looks_like_heading(&text);
    if is_heading {
        // The latest heading replaces the current context rather than
        // nesting under it.
        match heading_stack.last_mut() {
            Some(top) => *top = text.clone(),
            None => heading_stack.push(text.clone()),
        }
    }

    paragraphs.push(Paragraph {
        index: paragraphs.len(),
        text,
        heading_path: heading_stack.join(" > "),
        is_heading,
    });
}

fn looks_like_heading(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADING_CHARS {
        return false;
    }

    if trimmed.starts_with('#') {
        return true;
    }

    if trimmed.ends_with(':') {
        return true;
    }

    let letters = trimmed.chars().filter(|c| c.is_alphabetic()).count();
    if letters >= 4 {
        let upper = trimmed.chars().filter(|c| c.is_uppercase()).count();
        if upper as f64 >= letters as f64 * 0.7 {
            return true;
        }
    }

    false
}
