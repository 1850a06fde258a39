//! Lead-sentence extractive summarizer.

use async_trait::async_trait;

use noticeboard_core::config::EnrichmentConfig;
use noticeboard_core::result::AppResult;
use noticeboard_core::traits::Summarizer;

/// Keeps the leading sentences of a text, up to a sentence and character
/// budget. Whitespace runs collapse to a single space.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    max_sentences: usize,
    max_chars: usize,
}

impl ExtractiveSummarizer {
    /// Create a summarizer with explicit limits. Zero limits are raised to one.
    pub fn new(max_sentences: usize, max_chars: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
            max_chars: max_chars.max(1),
        }
    }

    /// Create a summarizer from the enrichment section.
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(config.max_summary_sentences, config.max_summary_chars)
    }

    /// Summarize synchronously.
    pub fn summarize_text(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return String::new();
        }

        let mut summary = String::new();
        for sentence in split_sentences(&collapsed).into_iter().take(self.max_sentences) {
            let extra = if summary.is_empty() { 0 } else { 1 };
            if summary.chars().count() + extra + sentence.chars().count() > self.max_chars {
                break;
            }
            if !summary.is_empty() {
                summary.push(' ');
            }
            summary.push_str(sentence);
        }

        if summary.is_empty() {
            // First sentence alone is over budget: cut it at a word boundary.
            summary = truncate_words(&collapsed, self.max_chars);
        }
        summary
    }
}

/// Split on `.`, `!` or `?` followed by a space. Terminators stay attached.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') && matches!(chars.peek(), Some((_, ' '))) {
            sentences.push(text[start..=i].trim());
            start = i + c.len_utf8();
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences.retain(|s| !s.is_empty());
    sentences
}

fn truncate_words(text: &str, max_chars: usize) -> String {
    let cut: String = text.chars().take(max_chars).collect();
    if cut.len() == text.len() {
        return cut;
    }
    match cut.rfind(' ') {
        Some(pos) if pos > 0 => cut[..pos].to_string(),
        _ => cut,
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, text: &str) -> AppResult<String> {
        Ok(self.summarize_text(text))
    }
}
