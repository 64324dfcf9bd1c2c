//! A matching session: one shared model, per-session settings, one report
//! per upload.

use crate::error::{JobMatcherError, Result};
use crate::input::manager::InputManager;
use crate::model::artifact::ModelArtifact;
use crate::output::report::{MatchReport, ReportMetadata};
use crate::processing::document::ResumeDocument;
use crate::processing::matcher::{MatchParams, Matcher};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Holds the settings for one user. Uploads never share results with each
/// other; only the read-only artifact is shared.
pub struct MatchSession<'a> {
    artifact: &'a ModelArtifact,
    params: MatchParams,
    input: InputManager,
}

impl<'a> MatchSession<'a> {
    pub fn new(artifact: &'a ModelArtifact, params: MatchParams) -> Self {
        Self {
            artifact,
            params,
            input: InputManager::new(),
        }
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    pub fn set_top_n(&mut self, top_n: usize) -> Result<()> {
        self.params = MatchParams::new(top_n, self.params.min_score)?;
        Ok(())
    }

    pub fn set_min_score(&mut self, min_score: f64) -> Result<()> {
        self.params = MatchParams::new(self.params.top_n, min_score)?;
        Ok(())
    }

    /// Extract, score and rank one resume file.
    pub async fn upload(&self, path: &Path) -> Result<MatchReport> {
        let start_time = Instant::now();
        let resume = self.input.load_resume(path).await?;
        self.report_for(&resume, start_time)
    }

    /// Same as [`upload`](Self::upload) for a PDF already in memory.
    pub fn upload_bytes(&self, name: &str, bytes: &[u8]) -> Result<MatchReport> {
        let start_time = Instant::now();
        let resume = self.input.load_resume_bytes(name, bytes)?;
        self.report_for(&resume, start_time)
    }

    fn report_for(&self, resume: &ResumeDocument, start_time: Instant) -> Result<MatchReport> {
        info!(
            "Matching resume {} ({} characters, {} pages)",
            resume.source,
            resume.char_count(),
            resume.page_count
        );
        let results = Matcher::new(self.artifact).match_text(&resume.text, &self.params)?;

        let artifact_name = self
            .artifact
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<in-memory>".to_string());
        let metadata = ReportMetadata::new(resume, artifact_name, start_time.elapsed().as_millis() as u64);

        Ok(MatchReport::new(results, self.params, metadata))
    }
}

/// One line of input in an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Upload(PathBuf),
    TopN(usize),
    MinScore(f64),
    Settings,
    Help,
    Quit,
    Empty,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(SessionCommand::Empty);
        }

        let mut parts = line.splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        match head.to_lowercase().as_str() {
            "quit" | "exit" => Ok(SessionCommand::Quit),
            "help" | "?" => Ok(SessionCommand::Help),
            "settings" => Ok(SessionCommand::Settings),
            "top" => arg.parse().map(SessionCommand::TopN).map_err(|_| {
                JobMatcherError::InvalidInput(format!("'top' expects a whole number, got '{}'", arg))
            }),
            "min" => arg.parse().map(SessionCommand::MinScore).map_err(|_| {
                JobMatcherError::InvalidInput(format!("'min' expects a number, got '{}'", arg))
            }),
            _ => Ok(SessionCommand::Upload(PathBuf::from(line))),
        }
    }
}

pub const SESSION_HELP: &str = "\
Commands:
  <path/to/resume.pdf>   match a resume
  top <n>                number of unique job matches
  min <score>            minimum match score (%)
  settings               show current settings
  help                   show this help
  quit                   leave the session";
