//! Match report: ranked results plus the context they were produced in

use crate::processing::document::ResumeDocument;
use crate::processing::matcher::{JobMatch, MatchParams, MatchResults, MatchSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a formatter needs to render one upload's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Ranked, deduplicated matches; empty means "no matches"
    pub matches: Vec<JobMatch>,
    pub summary: MatchSummary,
    pub parameters: MatchParams,
    pub metadata: ReportMetadata,
}

/// Report metadata and generation info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub resume_file: String,
    pub page_count: usize,
    pub resume_characters: usize,
    pub model_artifact: String,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(resume: &ResumeDocument, model_artifact: String, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            processing_time_ms,
            resume_file: resume.source.clone(),
            page_count: resume.page_count,
            resume_characters: resume.char_count(),
            model_artifact,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl MatchReport {
    pub fn new(results: MatchResults, parameters: MatchParams, metadata: ReportMetadata) -> Self {
        Self {
            matches: results.matches,
            summary: results.summary,
            parameters,
            metadata,
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Message shown in place of the result table when nothing matched.
    pub fn no_matches_message(&self) -> String {
        format!(
            "No job matches scored at or above {:.2}% (best score: {:.2}%). Try lowering the minimum match score.",
            self.parameters.min_score, self.summary.best_score
        )
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_no_matches_message_names_threshold() {
        let report = report(Vec::new());
        assert!(!report.has_matches());
        let message = report.no_matches_message();
        assert!(message.contains("15.00%"));
        assert!(message.contains("9.50%"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = report(vec![job(1, "Data Analyst", "sql", 55.3)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["matches"][0]["Role"], "Data Analyst");
        assert_eq!(json["matches"][0]["Match Score"], 55.3);
        assert_eq!(json["parameters"]["top_n"], 8);
        assert_eq!(json["metadata"]["page_count"], 2);
    }
}
