//! Input manager: validates an upload and turns it into a resume document

use crate::error::{JobMatcherError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::PdfExtractor;
use crate::processing::document::ResumeDocument;
use log::info;
use std::path::Path;

/// Resolves uploads to resume documents. Holds no state between uploads.
#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Load a resume from a file path.
    pub async fn load_resume(&self, path: &Path) -> Result<ResumeDocument> {
        if !path.exists() {
            return Err(JobMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                let extracted = PdfExtractor.extract(path).await?;
                Ok(ResumeDocument::new(path.display().to_string(), extracted))
            }
            FileType::Unknown => Err(JobMatcherError::UnsupportedFormat(format!(
                "Only PDF resumes are supported: {}",
                path.display()
            ))),
        }
    }

    /// Load a resume from bytes already in memory, e.g. an upload body.
    pub fn load_resume_bytes(&self, name: &str, bytes: &[u8]) -> Result<ResumeDocument> {
        info!("Extracting text from uploaded PDF: {} ({} bytes)", name, bytes.len());
        let extracted = PdfExtractor.extract_from_bytes(bytes)?;
        Ok(ResumeDocument::new(name, extracted))
    }
}
