use serde::{Deserialize, Serialize};

/// One paragraph of the source text, addressed by its 0-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    index: usize,
    lines: Vec<String>,
}

impl Paragraph {
    pub fn new(index: usize, lines: Vec<String>) -> Self {
        Self { index, lines }
    }

    /// Wrap an already isolated paragraph string.
    pub fn from_text(index: usize, text: &str) -> Self {
        Self::new(index, text.lines().map(str::to_owned).collect())
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Original lines joined by newlines, for display.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Trimmed lines joined by single spaces, the form that gets normalized.
    pub fn joined(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// At most `max_chars` characters of [`Paragraph::text`].
    pub fn preview(&self, max_chars: usize) -> String {
        self.text().chars().take(max_chars).collect()
    }
}

/// Split plain text into blank-line separated paragraphs.
///
/// A paragraph with any line containing `exclude_marker` (case-insensitive)
/// is dropped entirely, e.g. the "Project Gutenberg" header and footer blocks.
/// Surviving paragraphs are numbered densely from 0.
pub fn split_paragraphs(text: &str, exclude_marker: Option<&str>) -> Vec<Paragraph> {
    let marker = exclude_marker
        .map(str::to_lowercase)
        .filter(|m| !m.is_empty());
    let mut paragraphs = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut excluded = false;

    let mut flush = |lines: &mut Vec<String>, excluded: &mut bool| {
        if !lines.is_empty() && !*excluded {
            paragraphs.push(Paragraph::new(paragraphs.len(), std::mem::take(lines)));
        }
        lines.clear();
        *excluded = false;
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut lines, &mut excluded);
            continue;
        }
        if let Some(marker) = &marker {
            if line.to_lowercase().contains(marker.as_str()) {
                excluded = true;
            }
        }
        lines.push(line.trim_end().to_owned());
    }
    flush(&mut lines, &mut excluded);
    paragraphs
}

/// Parse a comma and/or newline separated stopword list.
/// Entries are trimmed; empty entries are skipped; case is kept.
pub fn parse_stopwords(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}
