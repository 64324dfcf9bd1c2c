//! Resume to job matching: score, filter, rank, deduplicate

use crate::error::{JobMatcherError, Result};
use crate::model::artifact::{JobPosting, ModelArtifact};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::ops::RangeInclusive;

pub const DEFAULT_TOP_N: usize = 8;
pub const DEFAULT_MIN_SCORE: f64 = 15.0;

/// Ranges offered by the interactive controls. Values outside are allowed.
pub const RECOMMENDED_TOP_N: RangeInclusive<usize> = 4..=16;
pub const RECOMMENDED_MIN_SCORE: RangeInclusive<f64> = 0.0..=50.0;

/// Filter and limit settings. They never change the scores themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Maximum number of distinct roles returned
    pub top_n: usize,
    /// Inclusive lower bound on the match score, in percent
    pub min_score: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl MatchParams {
    pub fn new(top_n: usize, min_score: f64) -> Result<Self> {
        if top_n == 0 {
            return Err(JobMatcherError::InvalidInput(
                "match count must be at least 1".to_string(),
            ));
        }
        if !min_score.is_finite() || !(0.0..=100.0).contains(&min_score) {
            return Err(JobMatcherError::InvalidInput(format!(
                "minimum match score must be between 0 and 100, got {}",
                min_score
            )));
        }

        if !RECOMMENDED_TOP_N.contains(&top_n) {
            warn!(
                "Match count {} is outside the recommended range {}-{}",
                top_n,
                RECOMMENDED_TOP_N.start(),
                RECOMMENDED_TOP_N.end()
            );
        }
        if !RECOMMENDED_MIN_SCORE.contains(&min_score) {
            warn!(
                "Minimum score {} is outside the recommended range {}-{}",
                min_score,
                RECOMMENDED_MIN_SCORE.start(),
                RECOMMENDED_MIN_SCORE.end()
            );
        }

        Ok(Self { top_n, min_score })
    }
}

/// One ranked job in the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    /// 1-based position in the result
    pub rank: usize,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Features")]
    pub features: String,
    /// Percentage in [0, 100], rounded to two decimals
    #[serde(rename = "Match Score")]
    pub match_score: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Counters describing how the result table was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub jobs_scored: usize,
    pub above_threshold: usize,
    pub duplicates_dropped: usize,
    /// Best score over the whole corpus, before filtering
    pub best_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResults {
    pub matches: Vec<JobMatch>,
    pub summary: MatchSummary,
}

impl MatchResults {
    /// An empty result is a valid outcome: no job cleared the threshold.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Round to two decimal places, halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Attach scores to jobs, then filter, stable-sort, deduplicate by role,
/// truncate and round.
///
/// Equal scores keep corpus order, so the earliest posting of a role wins a
/// tie. Filtering uses the unrounded score.
pub fn rank_scores(jobs: &[JobPosting], scores: &[f64], params: &MatchParams) -> Result<MatchResults> {
    if jobs.len() != scores.len() {
        return Err(JobMatcherError::Configuration(format!(
            "{} scores for {} jobs",
            scores.len(),
            jobs.len()
        )));
    }

    let best_score = scores.iter().copied().fold(0.0_f64, f64::max);

    let mut scored: Vec<(usize, f64)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| *score >= params.min_score)
        .collect();
    let above_threshold = scored.len();

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut seen_roles: HashSet<&str> = HashSet::new();
    let mut duplicates_dropped = 0;
    let mut matches = Vec::with_capacity(params.top_n.min(scored.len()));
    for (index, score) in scored {
        let job = &jobs[index];
        if !seen_roles.insert(job.role.as_str()) {
            duplicates_dropped += 1;
            continue;
        }
        if matches.len() == params.top_n {
            continue;
        }
        matches.push(JobMatch {
            rank: matches.len() + 1,
            role: job.role.clone(),
            features: job.features.clone(),
            match_score: round2(score),
            extra: job.extra.clone(),
        });
    }

    Ok(MatchResults {
        matches,
        summary: MatchSummary {
            jobs_scored: jobs.len(),
            above_threshold,
            duplicates_dropped,
            best_score: round2(best_score),
        },
    })
}

/// Scores resumes against a loaded artifact. Borrowing the artifact keeps
/// every call read-only; results belong to the caller.
pub struct Matcher<'a> {
    artifact: &'a ModelArtifact,
}

impl<'a> Matcher<'a> {
    pub fn new(artifact: &'a ModelArtifact) -> Self {
        Self { artifact }
    }

    /// Cosine similarity of the resume against every job, as percentages
    /// in corpus order.
    pub fn score(&self, resume_text: &str) -> Result<Vec<f64>> {
        let vector = self.artifact.vectorizer().transform(resume_text);
        if vector.is_zero() {
            debug!("Resume vector is all zeros");
        }

        let similarities = self.artifact.job_matrix().cosine_similarities(&vector)?;
        Ok(similarities
            .into_iter()
            .map(|similarity| (similarity * 100.0).clamp(0.0, 100.0))
            .collect())
    }

    /// Run the whole pipeline for one resume.
    pub fn match_text(&self, resume_text: &str, params: &MatchParams) -> Result<MatchResults> {
        let scores = self.score(resume_text)?;
        let results = rank_scores(self.artifact.jobs(), &scores, params)?;

        info!(
            "Matched {} of {} jobs above {:.2}% ({} duplicate roles dropped)",
            results.len(),
            results.summary.jobs_scored,
            params.min_score,
            results.summary.duplicates_dropped
        );
        Ok(results)
    }
}
