//! Configuration management for the resume job matcher

use crate::error::{JobMatcherError, Result};
use crate::processing::matcher::{MatchParams, DEFAULT_MIN_SCORE, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name the offline exporter writes the model bundle to.
pub const DEFAULT_ARTIFACT_NAME: &str = "resume_job_matcher_model.json";

/// Every section falls back to its defaults, so files written by older
/// versions keep loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub top_n: usize,
    pub min_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    /// Characters of the job description shown per match
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn parse(format: &str) -> std::result::Result<Self, String> {
        match format.to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!(
                "Invalid output format: {}. Supported: console, json, markdown, html",
                format
            )),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let artifact_path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-job-matcher")
            .join(DEFAULT_ARTIFACT_NAME);
        Self { artifact_path }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
            preview_chars: 220,
        }
    }
}

impl Config {
    /// Load from `path`, writing defaults there if it does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Overwrite `path` with defaults without reading it, so an unreadable
    /// file can always be repaired.
    pub fn reset(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-job-matcher")
            .join("config.toml")
    }

    /// Set one value by its dotted key, e.g. `matching.top_n`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |expected: &str| {
            JobMatcherError::Configuration(format!(
                "Invalid value '{}' for {}: expected {}",
                value, key, expected
            ))
        };

        match key {
            "model.artifact_path" => self.model.artifact_path = PathBuf::from(value),
            "matching.top_n" => {
                let top_n = value.parse().map_err(|_| invalid("a positive integer"))?;
                MatchParams::new(top_n, self.matching.min_score)?;
                self.matching.top_n = top_n;
            }
            "matching.min_score" => {
                let min_score = value.parse().map_err(|_| invalid("a number between 0 and 100"))?;
                MatchParams::new(self.matching.top_n, min_score)?;
                self.matching.min_score = min_score;
            }
            "output.format" => {
                self.output.format = OutputFormat::parse(value).map_err(JobMatcherError::Configuration)?;
            }
            "output.detailed" => self.output.detailed = value.parse().map_err(|_| invalid("true or false"))?,
            "output.color_output" => {
                self.output.color_output = value.parse().map_err(|_| invalid("true or false"))?
            }
            "output.preview_chars" => {
                self.output.preview_chars = value.parse().map_err(|_| invalid("a non-negative integer"))?
            }
            _ => {
                return Err(JobMatcherError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}
