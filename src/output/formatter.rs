//! Output formatters for match reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::MatchReport;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting match reports
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and score badges
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    preview_chars: usize,
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
    preview_chars: usize,
}

/// HTML formatter rendering match cards
pub struct HtmlFormatter {
    include_styles: bool,
    preview_chars: usize,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Cut a job description to `max_chars` characters and mark the cut.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}

fn score_label(score: f64) -> (&'static str, Color) {
    match score {
        s if s >= 70.0 => ("STRONG", Color::Green),
        s if s >= 50.0 => ("GOOD", Color::BrightGreen),
        s if s >= 30.0 => ("FAIR", Color::Yellow),
        _ => ("WEAK", Color::BrightRed),
    }
}

/// Askama template for HTML output
#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Job Matches</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1100px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .header {
            margin-bottom: 24px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 12px;
        }
        .subtitle { color: #6c757d; }
        .cards {
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 18px;
        }
        .card {
            padding: 16px;
            border-radius: 12px;
            background: #111827;
            color: #e5e7eb;
            min-height: 260px;
        }
        .score {
            font-size: 22px;
            font-weight: bold;
            color: #22c55e;
        }
        .empty {
            background: #fff3cd;
            border-left: 4px solid #ffc107;
            padding: 16px;
            border-radius: 6px;
        }
        .metadata {
            background: #e9ecef;
            padding: 15px;
            border-radius: 6px;
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="header">
        <h1>Best-Fit Job Matches</h1>
        <p class="subtitle">Top {{ top_n }} unique roles scoring at least {{ min_score }}% | Resume: {{ resume_file }}</p>
    </div>
    {% if has_matches %}
    <div class="cards">
        {% for card in cards %}
        <div class="card">
            <h4>#{{ card.rank }} {{ card.role }}</h4>
            <div class="score">{{ card.score }}%</div>
            <p>{{ card.preview }}</p>
        </div>
        {% endfor %}
    </div>
    {% else %}
    <div class="empty">
        <strong>No matches.</strong> {{ no_matches_message }}
    </div>
    {% endif %}
    <div class="metadata">
        <p><strong>Generated by resume-job-matcher v{{ version }}</strong> at {{ generated_at }} in {{ processing_time }}ms</p>
        <p><strong>Model:</strong> {{ model_artifact }} | <strong>Jobs scored:</strong> {{ jobs_scored }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    top_n: usize,
    min_score: String,
    resume_file: String,
    has_matches: bool,
    cards: Vec<HtmlCard>,
    no_matches_message: String,
    version: String,
    generated_at: String,
    processing_time: u64,
    model_artifact: String,
    jobs_scored: usize,
}

struct HtmlCard {
    rank: usize,
    role: String,
    score: String,
    preview: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, preview_chars: usize) -> Self {
        Self {
            use_colors,
            detailed,
            preview_chars,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = score_label(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("BEST-FIT JOB MATCHES"));
        output.push_str(&format!(
            "Resume: {} ({} pages, {} characters)\n",
            report.metadata.resume_file, report.metadata.page_count, report.metadata.resume_characters
        ));
        output.push_str(&format!(
            "Settings: top {} unique roles, minimum score {:.2}%\n\n",
            report.parameters.top_n, report.parameters.min_score
        ));

        if !report.has_matches() {
            output.push_str(&self.colorize(&report.no_matches_message(), Color::Yellow));
            output.push('\n');
        }

        for job in &report.matches {
            output.push_str(&format!(
                "{:>2}. {} {} {}\n",
                job.rank,
                self.colorize(&job.role, Color::White),
                self.colorize(&format!("{:.2}%", job.match_score), Color::Green),
                self.format_score_badge(job.match_score)
            ));
            let description = if self.detailed {
                job.features.clone()
            } else {
                truncate_description(&job.features, self.preview_chars)
            };
            output.push_str(&format!("    {}\n\n", self.colorize(&description, Color::BrightBlack)));
        }

        if self.detailed {
            output.push_str(&self.format_header("Scoring Details"));
            output.push_str(&format!("Jobs scored: {}\n", report.summary.jobs_scored));
            output.push_str(&format!("Above threshold: {}\n", report.summary.above_threshold));
            output.push_str(&format!("Duplicate roles dropped: {}\n", report.summary.duplicates_dropped));
            output.push_str(&format!("Best score: {:.2}%\n", report.summary.best_score));
            output.push_str(&format!("Model: {}\n", report.metadata.model_artifact));
        }

        output.push_str(&format!(
            "\nGenerated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, preview_chars: usize) -> Self {
        Self {
            include_metadata,
            preview_chars,
        }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Best-Fit Job Matches\n\n");
        output.push_str(&format!(
            "Top **{}** unique roles scoring at least **{:.2}%** for `{}`.\n\n",
            report.parameters.top_n, report.parameters.min_score, report.metadata.resume_file
        ));

        if report.has_matches() {
            output.push_str("| Rank | Role | Match Score | Description |\n");
            output.push_str("|---:|---|---:|---|\n");
            for job in &report.matches {
                output.push_str(&format!(
                    "| {} | {} | {:.2}% | {} |\n",
                    job.rank,
                    Self::escape_cell(&job.role),
                    job.match_score,
                    Self::escape_cell(&truncate_description(&job.features, self.preview_chars))
                ));
            }
        } else {
            output.push_str(&format!("> **No matches.** {}\n", report.no_matches_message()));
        }

        if self.include_metadata {
            output.push_str("\n---\n\n");
            output.push_str(&format!(
                "- Generated: {}\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            output.push_str(&format!("- Processing time: {}ms\n", report.metadata.processing_time_ms));
            output.push_str(&format!("- Model: {}\n", report.metadata.model_artifact));
            output.push_str(&format!("- Jobs scored: {}\n", report.summary.jobs_scored));
            output.push_str(&format!("- resume-job-matcher v{}\n", report.metadata.tool_version));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool, preview_chars: usize) -> Self {
        Self {
            include_styles,
            preview_chars,
        }
    }

    fn create_template_data(&self, report: &MatchReport) -> HtmlTemplate {
        let cards = report
            .matches
            .iter()
            .map(|job| HtmlCard {
                rank: job.rank,
                role: job.role.clone(),
                score: format!("{:.2}", job.match_score),
                preview: truncate_description(&job.features, self.preview_chars),
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            top_n: report.parameters.top_n,
            min_score: format!("{:.2}", report.parameters.min_score),
            resume_file: report.metadata.resume_file.clone(),
            has_matches: report.has_matches(),
            cards,
            no_matches_message: report.no_matches_message(),
            version: report.metadata.tool_version.clone(),
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            processing_time: report.metadata.processing_time_ms,
            model_artifact: report.metadata.model_artifact.clone(),
            jobs_scored: report.summary.jobs_scored,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        Ok(self.create_template_data(report).render()?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool, preview_chars: usize) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed, preview_chars),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, preview_chars),
            html_formatter: HtmlFormatter::new(true, preview_chars),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_matches{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_matches{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_matches{}.md", base_name, timestamp_suffix),
        OutputFormat::Html => format!("{}_matches{}.html", base_name, timestamp_suffix),
    }
}
