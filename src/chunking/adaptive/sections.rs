//! Heading detection and section splitting for the adaptive chunker.
//!
//! A document is parsed line by line into ordered sections, each carrying the
//! heading path (stack of ancestor headings) in force where its content
//! begins. Markdown `#` headings always win; plain-text heuristics (numbered
//! markers, trailing colons, mostly-uppercase lines) apply only until the
//! first markdown heading is seen.

const MAX_PLAIN_HEADING_CHARS: usize = 80;
const ROMAN_DIGITS: &str = "IVXLCDM";

/// An ordered slice of the document under one heading path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Ancestor headings from outermost to innermost.
    pub path: Vec<String>,
    /// Raw section body, heading lines excluded.
    pub content: String,
}

/// Splits text into [`Section`]s keyed by hierarchical heading path.
#[derive(Clone, Debug)]
pub struct SectionParser {
    trim_whitespace: bool,
}

impl SectionParser {
    pub fn new(trim_whitespace: bool) -> Self {
        Self { trim_whitespace }
    }

    /// Parses `text` into ordered sections. A document without headings
    /// yields a single section with an empty path.
    pub fn parse(&self, text: &str) -> Vec<Section> {
        let normalized = text.replace("\r\n", "\n");

        let mut sections = Vec::new();
        let mut current_path: Vec<String> = Vec::new();
        let mut buffer = String::new();
        let mut saw_markdown_heading = false;

        for raw in normalized.split('\n') {
            let line = if self.trim_whitespace { raw.trim() } else { raw };
            let candidate = line.trim();

            if let Some((level, heading)) = parse_markdown_heading(candidate) {
                saw_markdown_heading = true;
                flush(&mut buffer, &current_path, &mut sections);
                update_path(&mut current_path, level, heading);
                continue;
            }

            if !saw_markdown_heading {
                if let Some((level, heading)) = parse_plain_heading(candidate) {
                    flush(&mut buffer, &current_path, &mut sections);
                    update_path(&mut current_path, level, heading);
                    continue;
                }
            }

            buffer.push_str(line);
            buffer.push('\n');
        }

        flush(&mut buffer, &current_path, &mut sections);

        if sections.is_empty() {
            sections.push(Section {
                path: current_path,
                content: String::new(),
            });
        }

        sections
    }
}

fn flush(buffer: &mut String, path: &[String], sections: &mut Vec<Section>) {
    if buffer.is_empty() {
        return;
    }
    sections.push(Section {
        path: path.to_vec(),
        content: buffer.trim_matches('\n').to_string(),
    });
    buffer.clear();
}

/// A heading of level `n` replaces any ancestors at depth `n` or deeper.
fn update_path(path: &mut Vec<String>, level: usize, heading: String) {
    let level = level.clamp(1, 6);
    if path.len() >= level {
        path.truncate(level - 1);
    }
    path.push(heading);
}

/// `#`–`######` followed by a space; heading text keeps no trailing colon.
fn parse_markdown_heading(line: &str) -> Option<(usize, String)> {
    if line.trim().is_empty() {
        return None;
    }

    let hash_count = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&hash_count) {
        return None;
    }

    let rest = &line[hash_count..];
    if !rest.starts_with(' ') {
        return None;
    }

    let heading = rest.trim().trim_end_matches(':').to_string();
    if heading.is_empty() {
        return None;
    }

    Some((hash_count, heading))
}

fn parse_plain_heading(line: &str) -> Option<(usize, String)> {
    if line.trim().is_empty() || line.ends_with('.') {
        return None;
    }

    if line.chars().count() > MAX_PLAIN_HEADING_CHARS {
        return None;
    }

    if let Some(level) = numbered_heading_level(line) {
        return Some((level, clean_heading(line)));
    }

    if let Some(stripped) = line.strip_suffix(':') {
        return Some((1, clean_heading(stripped)));
    }

    if is_mostly_upper(line) {
        return Some((1, clean_heading(line)));
    }

    None
}

/// Infers a heading level from a leading list marker: roman numerals and
/// letter indices map to level 1, dotted numerics (`1.2.3`) to their nesting
/// depth plus one.
fn numbered_heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if starts_with_roman_numeral(trimmed) || starts_with_letter_index(trimmed) {
        return Some(1);
    }

    let mut depth = 0usize;
    let mut numeric_len = 0usize;

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            numeric_len += 1;
            continue;
        }

        if ch == '.' {
            if numeric_len == 0 {
                return None;
            }
            depth += 1;
            numeric_len = 0;
            continue;
        }

        if ch == ')' && numeric_len > 0 {
            depth += 1;
        }
        break;
    }

    if depth == 0 && numeric_len == 0 {
        return None;
    }

    Some((depth + 1).clamp(1, 6))
}

fn starts_with_roman_numeral(text: &str) -> bool {
    let trimmed = text.trim_start();
    let chars: Vec<char> = trimmed.chars().collect();

    let mut index = 0;
    while index < chars.len() && ROMAN_DIGITS.contains(chars[index].to_ascii_uppercase()) {
        index += 1;
    }

    if index == 0 || index >= chars.len() {
        return false;
    }

    matches!(chars[index], '.' | ')') && index <= 6
}

fn starts_with_letter_index(text: &str) -> bool {
    let trimmed = text.trim_start();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) => first.is_alphabetic() && matches!(second, '.' | ')'),
        _ => false,
    }
}

/// At least four letters, of which at least 70% are uppercase.
fn is_mostly_upper(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 4 {
        return false;
    }
    let upper = line.chars().filter(|c| c.is_uppercase()).count();
    upper as f64 >= letters as f64 * 0.7
}

fn clean_heading(heading: &str) -> String {
    heading.trim().trim_end_matches(':').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Section> {
        SectionParser::new(true).parse(text)
    }

    #[test]
    fn markdown_headings_build_a_path() {
        let sections = parse("# Title\n## Sub\nbody line\n");

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].path, vec!["Title", "Sub"]);
        assert_eq!(sections[0].content, "body line");
    }

    #[test]
    fn shallower_heading_truncates_deeper_ancestors() {
        let text = "# A\n## B\nfirst\n# C\nsecond\n";
        let sections = parse(text);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].path, vec!["A", "B"]);
        assert_eq!(sections[1].path, vec!["C"]);
    }

    #[test]
    fn same_level_heading_replaces_sibling() {
        let text = "## One\nalpha\n## Two\nbeta\n";
        let sections = parse(text);

        assert_eq!(sections[0].path, vec!["One"]);
        assert_eq!(sections[1].path, vec!["Two"]);
    }

    #[test]
    fn trailing_colon_is_stripped_from_heading_text() {
        let sections = parse("# Setup:\nsteps\n");
        assert_eq!(sections[0].path, vec!["Setup"]);
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        let sections = parse("#tag\ncontent\n");
        assert!(sections[0].path.is_empty());
        assert!(sections[0].content.contains("#tag"));
    }

    #[test]
    fn colon_terminated_line_is_a_plain_heading() {
        let sections = parse("Products:\nitem one\n");
        assert_eq!(sections[0].path, vec!["Products"]);
        assert_eq!(sections[0].content, "item one");
    }

    #[test]
    fn mostly_uppercase_line_is_a_plain_heading() {
        let sections = parse("DISPLAYS AND FIXTURES\nshelving and storage\n");
        assert_eq!(sections[0].path, vec!["DISPLAYS AND FIXTURES"]);
    }

    #[test]
    fn numbered_marker_infers_depth() {
        let sections = parse("1.2 Install\ncontent\n");
        // One dot of nesting puts the heading at level 2.
        assert_eq!(sections[0].path, vec!["1.2 Install"]);
    }

    #[test]
    fn roman_numeral_marker_is_level_one() {
        let text = "II. Background\nalpha\nIII. Method\nbeta\n";
        let sections = parse(text);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].path, vec!["II. Background"]);
        assert_eq!(sections[1].path, vec!["III. Method"]);
    }

    #[test]
    fn plain_heuristics_stop_after_first_markdown_heading() {
        let text = "# Real\nPRODUCTS AND SERVICES\nmore content\n";
        let sections = parse(text);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].path, vec!["Real"]);
        assert!(sections[0].content.contains("PRODUCTS AND SERVICES"));
    }

    #[test]
    fn sentence_lines_are_not_headings() {
        let sections = parse("This line ends with a period.\nmore\n");
        assert!(sections[0].path.is_empty());
    }

    #[test]
    fn long_lines_are_not_plain_headings() {
        let long = format!("{}:", "x".repeat(90));
        let sections = parse(&format!("{long}\nbody\n"));
        assert!(sections[0].path.is_empty());
    }

    #[test]
    fn empty_document_yields_one_empty_section() {
        let sections = parse("");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].path.is_empty());
        assert!(sections[0].content.is_empty());
    }
}
