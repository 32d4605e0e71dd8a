//! Document structures shared by every extractor

use serde::{Deserialize, Serialize};

/// Plain-text resume, split into lines once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    content: String,
    lowercase: String,
    lines: Vec<String>,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub word_count: usize,
    pub character_count: usize,
    pub line_count: usize,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let lowercase = content.to_lowercase();
        // Lines keep their surrounding whitespace; extractors trim as needed
        let lines: Vec<String> = content
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();

        let metadata = DocumentMetadata {
            word_count: content.split_whitespace().count(),
            character_count: content.chars().count(),
            line_count: lines.len(),
        };

        Self {
            content,
            lowercase,
            lines,
            metadata,
        }
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Leading slice of the text, at most `max_chars` characters, cut on a char boundary
    pub fn head(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
