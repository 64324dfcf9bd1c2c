//! Text extraction from resume PDFs

use crate::error::{JobMatcherError, Result};
use crate::input::file_detector::has_pdf_signature;
use log::{debug, warn};
use std::path::Path;
use tokio::fs;

/// Text pulled out of a document, page by page, joined in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
    /// Pages that yielded no text at all (e.g. scanned images)
    pub empty_pages: usize,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Join page texts in order with no separator. Pages that yield nothing are
/// skipped silently, so text from neighbouring pages may run together.
pub fn concat_pages<I, S>(pages: I) -> ExtractedText
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extracted = ExtractedText::default();
    for page in pages {
        let page = page.as_ref();
        extracted.page_count += 1;
        if page.is_empty() {
            extracted.empty_pages += 1;
        } else {
            extracted.text.push_str(page);
        }
    }
    extracted
}

/// pdf-extract opens every page with line breaks of its own; drop them so
/// pages join with nothing in between.
fn strip_page_break(page: &str) -> &str {
    page.trim_start_matches(['\r', '\n'])
}

pub struct PdfExtractor;

impl PdfExtractor {
    /// Read a PDF from disk and extract its text.
    pub async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let bytes = fs::read(path).await.map_err(JobMatcherError::Io)?;

        self.extract_from_bytes(&bytes).map_err(|e| match e {
            JobMatcherError::DocumentParse(msg) => JobMatcherError::DocumentParse(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Extract text from an in-memory PDF.
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Result<ExtractedText> {
        if !has_pdf_signature(bytes) {
            return Err(JobMatcherError::DocumentParse(
                "input is not a PDF document (missing %PDF header)".to_string(),
            ));
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| JobMatcherError::DocumentParse(e.to_string()))?;

        let extracted = concat_pages(pages.iter().map(|page| strip_page_break(page)));
        debug!(
            "Extracted {} characters from {} pages ({} empty)",
            extracted.text.chars().count(),
            extracted.page_count,
            extracted.empty_pages
        );
        if extracted.is_empty() {
            warn!("PDF yielded no extractable text; every job will score 0%");
        }

        Ok(extracted)
    }
}
