//! Per-upload resume document

use crate::input::text_extractor::ExtractedText;
use serde::{Deserialize, Serialize};

/// A resume as seen by one upload. Built fresh on every upload and dropped
/// with the request; nothing here is cached or shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    /// Display name of the upload (usually the file path)
    pub source: String,
    pub text: String,
    pub page_count: usize,
    pub empty_pages: usize,
}

impl ResumeDocument {
    pub fn new(source: impl Into<String>, extracted: ExtractedText) -> Self {
        Self {
            source: source.into(),
            text: extracted.text,
            page_count: extracted.page_count,
            empty_pages: extracted.empty_pages,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// True when no page yielded any text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
