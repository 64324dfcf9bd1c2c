//! CLI interface for the resume job matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-job-matcher")]
#[command(about = "Match a resume PDF against a catalog of job postings")]
#[command(long_about = "Rank job roles by TF-IDF cosine similarity between your resume and each job posting, keeping the best posting per role")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match one resume against the job catalog
    Match {
        /// Path to resume file (PDF)
        #[arg(short, long)]
        resume: PathBuf,

        /// Model bundle to use (defaults to the configured artifact)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Number of unique job roles to return
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Minimum match score in percent
        #[arg(short = 's', long)]
        min_score: Option<f64>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Show scoring statistics and full descriptions
        #[arg(short, long)]
        detailed: bool,
    },

    /// Match resumes one after another in a session, adjusting settings as you go
    Interactive {
        /// Model bundle to use (defaults to the configured artifact)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Initial number of unique job roles to return
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Initial minimum match score in percent
        #[arg(short = 's', long)]
        min_score: Option<f64>,
    },

    /// Inspect the model bundle
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// Show vocabulary, corpus and weighting details
    Info {
        /// Model bundle (defaults to the configured artifact)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// List the distinct job roles in corpus order
    Roles {
        /// Model bundle (defaults to the configured artifact)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "matching.min_score")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(format)
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
