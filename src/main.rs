//! resume-job-matcher: rank job roles for a resume PDF

use clap::Parser;
use indicatif::ProgressBar;
use log::{error, info};
use resume_job_matcher::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_job_matcher::config::{Config, OutputFormat};
use resume_job_matcher::error::{JobMatcherError, Result};
use resume_job_matcher::model::{store, ModelArtifact};
use resume_job_matcher::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_job_matcher::processing::matcher::MatchParams;
use resume_job_matcher::session::{MatchSession, SessionCommand, SESSION_HELP};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Execute command
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    if let Err(e) = run_command(cli.command, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config_path: &Path) -> Result<()> {
    // Reset must work even when the current file no longer parses
    if let Commands::Config {
        action: Some(ConfigAction::Reset),
    } = command
    {
        Config::reset(config_path)?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let config = Config::load_from(config_path).map_err(|e| {
        error!(
            "Failed to load configuration from {} (run `config reset` to restore defaults)",
            config_path.display()
        );
        e
    })?;

    match command {
        Commands::Match {
            resume,
            model,
            top_n,
            min_score,
            output,
            save,
            detailed,
        } => {
            cli::validate_file_extension(&resume, &["pdf"])
                .map_err(|e| JobMatcherError::InvalidInput(format!("Resume file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(JobMatcherError::InvalidInput)?,
                None => config.output.format,
            };
            let params = resolve_params(&config, top_n, min_score)?;
            let artifact = store::shared(&resolve_model_path(&config, model))?;

            let spinner = (output_format == OutputFormat::Console).then(|| {
                let spinner = ProgressBar::new_spinner();
                spinner.set_message("Extracting resume & matching jobs...");
                spinner.enable_steady_tick(Duration::from_millis(100));
                spinner
            });

            let session = MatchSession::new(artifact, params);
            let result = session.upload(&resume).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            let report = result?;

            let generator = ReportGenerator::new(
                config.output.color_output,
                detailed || config.output.detailed,
                config.output.preview_chars,
            );
            let rendered = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggest_filename(&output_format, &report.metadata.resume_file, true))
                    } else {
                        path
                    };
                    save_report_to_file(&rendered, &path)?;
                    info!("Report saved to {}", path.display());
                    println!("Saved {} matches to {}", report.matches.len(), path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Interactive { model, top_n, min_score } => {
            let params = resolve_params(&config, top_n, min_score)?;
            let artifact = store::shared(&resolve_model_path(&config, model))?;
            run_interactive(MatchSession::new(artifact, params), &config).await?;
        }

        Commands::Model { action } => match action {
            ModelAction::Info { model } => {
                let artifact = store::shared(&resolve_model_path(&config, model))?;
                let summary = artifact.summary();

                println!("Model Information\n");
                if let Some(source) = &summary.source {
                    println!("Source: {}", source);
                }
                println!("Job postings: {}", summary.jobs);
                println!("Distinct roles: {}", summary.distinct_roles);
                println!("Vocabulary size: {}", summary.vocabulary_size);
                println!("Stored matrix values: {}", summary.stored_values);
                println!("IDF weighting: {}", if summary.uses_idf { "yes" } else { "no" });
                println!("Sublinear tf: {}", if summary.sublinear_tf { "yes" } else { "no" });
                println!("Normalization: {}", summary.norm);
                println!("N-gram range: {}-{}", summary.ngram_range.0, summary.ngram_range.1);
            }

            ModelAction::Roles { model } => {
                let artifact = store::shared(&resolve_model_path(&config, model))?;
                print_roles(artifact);
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Current Configuration ({})\n", config_path.display());
                println!("Model artifact: {}", config.model.artifact_path.display());
                println!("\nMatching:");
                println!("  Unique job matches: {}", config.matching.top_n);
                println!("  Minimum match score: {:.2}%", config.matching.min_score);
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Detailed: {}", config.output.detailed);
                println!("  Colors: {}", config.output.color_output);
                println!("  Description preview: {} characters", config.output.preview_chars);
            }

            Some(ConfigAction::Reset) => {
                Config::reset(config_path)?;
                println!("Configuration reset to defaults");
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut config = config;
                config.set_value(&key, &value)?;
                config.save_to(config_path)?;
                println!("Set {} = {}", key, value);
            }
        },
    }

    Ok(())
}

/// Interactive session loop: each path is a new upload, settings persist
/// for the session only.
async fn run_interactive(mut session: MatchSession<'_>, config: &Config) -> Result<()> {
    let generator = ReportGenerator::new(
        config.output.color_output,
        config.output.detailed,
        config.output.preview_chars,
    );

    println!("Resume-Job Matching session. Type 'help' for commands.");
    print_settings(session.params());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            SessionCommand::Empty => {}
            SessionCommand::Quit => break,
            SessionCommand::Help => println!("{}", SESSION_HELP),
            SessionCommand::Settings => print_settings(session.params()),
            SessionCommand::TopN(top_n) => match session.set_top_n(top_n) {
                Ok(()) => print_settings(session.params()),
                Err(e) => println!("{}", e),
            },
            SessionCommand::MinScore(min_score) => match session.set_min_score(min_score) {
                Ok(()) => print_settings(session.params()),
                Err(e) => println!("{}", e),
            },
            SessionCommand::Upload(path) => {
                let report = session
                    .upload(&path)
                    .await
                    .and_then(|report| generator.generate_report(&report, &OutputFormat::Console));
                match report {
                    Ok(rendered) => println!("{}", rendered),
                    Err(e) => {
                        error!("Upload failed: {}", e);
                        println!("Could not match {}: {}", path.display(), e);
                    }
                }
            }
        }
    }

    Ok(())
}

fn resolve_params(config: &Config, top_n: Option<usize>, min_score: Option<f64>) -> Result<MatchParams> {
    MatchParams::new(
        top_n.unwrap_or(config.matching.top_n),
        min_score.unwrap_or(config.matching.min_score),
    )
}

fn resolve_model_path(config: &Config, model: Option<PathBuf>) -> PathBuf {
    model.unwrap_or_else(|| config.model.artifact_path.clone())
}

fn print_settings(params: &MatchParams) {
    let model = store::loaded()
        .and_then(ModelArtifact::source)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<not loaded>".to_string());
    println!(
        "Settings: {} unique job matches, minimum score {:.2}% (model: {})",
        params.top_n, params.min_score, model
    );
}

fn print_roles(artifact: &ModelArtifact) {
    let roles = artifact.distinct_roles();
    println!("{} distinct roles across {} postings\n", roles.len(), artifact.jobs().len());
    for (i, role) in roles.iter().enumerate() {
        println!("  {}. {}", i + 1, role);
    }
}
