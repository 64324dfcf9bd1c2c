//! Model bundle: fitted vectorizer, job feature matrix and the jobs table

use crate::error::{JobMatcherError, Result};
use crate::model::matrix::{CsrMatrix, JobMatrix};
use crate::model::vectorizer::{TermVectorizer, VectorizerSpec};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Bundle layout understood by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Keys a match result already serializes; extra job columns may not reuse them.
pub const RESERVED_COLUMNS: &[&str] = &["rank", "Role", "Features", "Match Score"];

/// One row of the jobs table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Features")]
    pub features: String,
    /// Any further columns, carried through to match results untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPosting {
    pub fn new(role: impl Into<String>, features: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            features: features.into(),
            extra: Map::new(),
        }
    }
}

/// On-disk JSON form of the model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub format_version: u32,
    pub vectorizer: VectorizerSpec,
    pub job_matrix: CsrMatrix,
    pub jobs: Vec<JobPosting>,
}

/// A loaded and shape-checked model bundle. Immutable once built.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    source: Option<PathBuf>,
    vectorizer: TermVectorizer,
    job_matrix: JobMatrix,
    jobs: Vec<JobPosting>,
}

/// Human-facing description of a loaded artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub source: Option<String>,
    pub jobs: usize,
    pub distinct_roles: usize,
    pub vocabulary_size: usize,
    pub stored_values: usize,
    pub uses_idf: bool,
    pub sublinear_tf: bool,
    pub norm: String,
    pub ngram_range: (usize, usize),
}

impl ModelArtifact {
    /// Read a JSON bundle from disk. Every failure, including a missing
    /// file, is reported as an artifact load error.
    pub fn load(path: &Path) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading model artifact from: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| {
            JobMatcherError::ArtifactLoad(format!(
                "Failed to read model artifact '{}': {}",
                path.display(),
                e
            ))
        })?;

        let bundle: ArtifactBundle = serde_json::from_slice(&bytes).map_err(|e| {
            JobMatcherError::ArtifactLoad(format!(
                "Failed to parse model artifact '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut artifact = Self::from_bundle(bundle).map_err(|e| match e {
            JobMatcherError::ArtifactLoad(msg) => {
                JobMatcherError::ArtifactLoad(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        artifact.source = Some(path.to_path_buf());

        info!(
            "Model artifact loaded in {:.2?}: {} jobs, {} terms",
            start_time.elapsed(),
            artifact.jobs.len(),
            artifact.vectorizer.n_features()
        );
        Ok(artifact)
    }

    /// Validate an in-memory bundle.
    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self> {
        if bundle.format_version != FORMAT_VERSION {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "unsupported format_version {} (expected {})",
                bundle.format_version, FORMAT_VERSION
            )));
        }

        let vectorizer = TermVectorizer::from_spec(bundle.vectorizer)?;
        let job_matrix = JobMatrix::from_csr(bundle.job_matrix)?;

        if job_matrix.n_rows() != bundle.jobs.len() {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "job matrix has {} rows but the jobs table has {} records",
                job_matrix.n_rows(),
                bundle.jobs.len()
            )));
        }
        if job_matrix.n_features() != vectorizer.n_features() {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "job matrix has {} columns but the vocabulary has {} terms",
                job_matrix.n_features(),
                vectorizer.n_features()
            )));
        }
        debug!("Job matrix holds {} stored values", job_matrix.nnz());

        let mut jobs = bundle.jobs;
        for column in RESERVED_COLUMNS {
            let dropped = jobs
                .iter_mut()
                .filter_map(|job| job.extra.remove(*column))
                .count();
            if dropped > 0 {
                warn!("Ignoring job column '{}' in {} postings: the name is reserved", column, dropped);
            }
        }

        Ok(Self {
            source: None,
            vectorizer,
            job_matrix,
            jobs,
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn vectorizer(&self) -> &TermVectorizer {
        &self.vectorizer
    }

    pub fn job_matrix(&self) -> &JobMatrix {
        &self.job_matrix
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    /// Distinct role names in corpus order.
    pub fn distinct_roles(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.jobs
            .iter()
            .map(|job| job.role.as_str())
            .filter(|role| seen.insert(*role))
            .collect()
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            source: self.source.as_ref().map(|p| p.display().to_string()),
            jobs: self.jobs.len(),
            distinct_roles: self.distinct_roles().len(),
            vocabulary_size: self.vectorizer.n_features(),
            stored_values: self.job_matrix.nnz(),
            uses_idf: self.vectorizer.uses_idf(),
            sublinear_tf: self.vectorizer.sublinear_tf(),
            norm: self.vectorizer.norm().to_string(),
            ngram_range: self.vectorizer.ngram_range(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::bundle_for;
    use std::io::Write;

    #[test]
    fn test_from_bundle_accepts_consistent_bundle() {
        let bundle = bundle_for(&[
            ("Data Analyst", "sql excel dashboards"),
            ("Backend Engineer", "rust postgres kafka"),
            ("Data Analyst", "sql python reporting"),
        ]);
        let artifact = ModelArtifact::from_bundle(bundle).unwrap();

        assert_eq!(artifact.jobs().len(), 3);
        assert_eq!(artifact.distinct_roles(), vec!["Data Analyst", "Backend Engineer"]);
        assert_eq!(artifact.job_matrix().n_rows(), 3);
        assert!(artifact.source().is_none());

        let summary = artifact.summary();
        assert_eq!(summary.jobs, 3);
        assert_eq!(summary.distinct_roles, 2);
        assert_eq!(summary.norm, "l2");
        assert!(!summary.uses_idf);
    }

    #[test]
    fn test_row_count_mismatch_is_rejected() {
        let mut bundle = bundle_for(&[("Data Analyst", "sql excel")]);
        bundle.jobs.push(JobPosting::new("Extra", "no row"));
        let err = ModelArtifact::from_bundle(bundle).unwrap_err();
        assert!(matches!(err, JobMatcherError::ArtifactLoad(_)));
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let mut bundle = bundle_for(&[("Data Analyst", "sql excel")]);
        bundle.job_matrix.shape.1 += 1;
        assert!(matches!(
            ModelArtifact::from_bundle(bundle),
            Err(JobMatcherError::ArtifactLoad(_))
        ));
    }

    #[test]
    fn test_unknown_format_version_is_rejected() {
        let mut bundle = bundle_for(&[("Data Analyst", "sql excel")]);
        bundle.format_version = 7;
        assert!(matches!(
            ModelArtifact::from_bundle(bundle),
            Err(JobMatcherError::ArtifactLoad(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let bundle = bundle_for(&[("QA Engineer", "selenium pytest automation")]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&bundle).unwrap().as_bytes()).unwrap();

        let artifact = ModelArtifact::load(file.path()).unwrap();
        assert_eq!(artifact.source(), Some(file.path()));
        assert_eq!(artifact.jobs()[0].role, "QA Engineer");
    }

    #[test]
    fn test_load_missing_or_corrupt_file() {
        let missing = ModelArtifact::load(Path::new("does/not/exist.json"));
        assert!(matches!(missing, Err(JobMatcherError::ArtifactLoad(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04pickle-not-json").unwrap();
        assert!(matches!(
            ModelArtifact::load(file.path()),
            Err(JobMatcherError::ArtifactLoad(_))
        ));
    }

    #[test]
    fn test_reserved_job_columns_are_dropped() {
        let mut bundle = bundle_for(&[("Data Analyst", "sql excel"), ("QA Engineer", "pytest")]);
        let json = r#"{"Role": "Data Analyst", "Features": "sql excel", "rank": 9, "Match Score": 99.0, "Company": "Acme"}"#;
        bundle.jobs[0] = serde_json::from_str(json).unwrap();

        let artifact = ModelArtifact::from_bundle(bundle).unwrap();
        let extra = &artifact.jobs()[0].extra;
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("Company"), Some(&Value::String("Acme".to_string())));

        let serialized = serde_json::to_string(&artifact.jobs()[0]).unwrap();
        assert_eq!(serialized.matches("\"Role\"").count(), 1);
        assert!(!serialized.contains("Match Score"));
    }

    #[test]
    fn test_extra_job_columns_round_trip() {
        let json = r#"{"Role": "Data Analyst", "Features": "sql", "Company": "Acme", "Salary": 50000}"#;
        let job: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(job.role, "Data Analyst");
        assert_eq!(job.extra.get("Company"), Some(&Value::String("Acme".to_string())));
        assert_eq!(job.extra.len(), 2);
    }
}
