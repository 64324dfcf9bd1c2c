//! Term-frequency feature space shared by resumes and job postings
//!
//! The vectorizer is fitted offline; this module only applies it. Its
//! analysis and weighting follow the fitted TF-IDF transformer that produced
//! the job matrix, so a resume lands in exactly the same space as the jobs.

use crate::error::{JobMatcherError, Result};
use crate::model::matrix::SparseVector;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    #[default]
    L2,
    #[serde(rename = "none")]
    Off,
}

impl std::fmt::Display for Norm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Norm::L1 => write!(f, "l1"),
            Norm::L2 => write!(f, "l2"),
            Norm::Off => write!(f, "none"),
        }
    }
}

/// Serialized form of a fitted vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerSpec {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,
    /// Per-column inverse document frequency; absent means plain term frequency.
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl VectorizerSpec {
    /// Default analysis and weighting over `vocabulary`.
    pub fn with_vocabulary(vocabulary: HashMap<String, usize>) -> Self {
        Self {
            vocabulary,
            idf: None,
            lowercase: default_lowercase(),
            token_pattern: default_token_pattern(),
            stop_words: Vec::new(),
            ngram_range: default_ngram_range(),
            sublinear_tf: false,
            binary: false,
            norm: Norm::default(),
        }
    }
}

/// A validated, ready-to-use vectorizer.
#[derive(Debug, Clone)]
pub struct TermVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    token_regex: Regex,
    stop_words: HashSet<String>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    binary: bool,
    norm: Norm,
}

impl TermVectorizer {
    pub fn from_spec(spec: VectorizerSpec) -> Result<Self> {
        let n_features = spec.vocabulary.len();

        let mut seen = vec![false; n_features];
        for (term, &col) in &spec.vocabulary {
            if col >= n_features {
                return Err(JobMatcherError::ArtifactLoad(format!(
                    "vocabulary index {} for term '{}' is out of range for {} terms",
                    col, term, n_features
                )));
            }
            if seen[col] {
                return Err(JobMatcherError::ArtifactLoad(format!(
                    "vocabulary index {} is assigned to more than one term",
                    col
                )));
            }
            seen[col] = true;
        }

        if let Some(idf) = &spec.idf {
            if idf.len() != n_features {
                return Err(JobMatcherError::ArtifactLoad(format!(
                    "idf has {} weights but the vocabulary has {} terms",
                    idf.len(),
                    n_features
                )));
            }
            if idf.iter().any(|w| !w.is_finite()) {
                return Err(JobMatcherError::ArtifactLoad(
                    "idf contains non-finite weights".to_string(),
                ));
            }
        }

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(&spec.token_pattern).map_err(|e| {
            JobMatcherError::ArtifactLoad(format!(
                "invalid token pattern '{}': {}",
                spec.token_pattern, e
            ))
        })?;
        // group 0 plus at most one capture group
        if token_regex.captures_len() > 2 {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "token pattern '{}' has more than one capture group",
                spec.token_pattern
            )));
        }

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            lowercase: spec.lowercase,
            token_regex,
            stop_words: spec.stop_words.into_iter().collect(),
            ngram_range: spec.ngram_range,
            sublinear_tf: spec.sublinear_tf,
            binary: spec.binary,
            norm: spec.norm,
        })
    }

    /// Width of the feature space.
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn uses_idf(&self) -> bool {
        self.idf.is_some()
    }

    pub fn norm(&self) -> Norm {
        self.norm
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    /// Split text into the terms the vocabulary is keyed on: tokens, minus
    /// stop words, expanded into word n-grams.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let tokens: Vec<String> = self
            .token_regex
            .captures_iter(&text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().to_string())
            .filter(|token| !self.stop_words.contains(token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }

        let mut terms = Vec::new();
        if min_n == 1 {
            terms.extend(tokens.iter().cloned());
        }
        for n in min_n.max(2)..=max_n {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Map text into the feature space. Terms outside the vocabulary are
    /// ignored, so empty or fully out-of-vocabulary text gives the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        let mut total_terms = 0usize;
        for term in self.analyze(text) {
            total_terms += 1;
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }
        debug!(
            "Vectorized {} terms, {} distinct in vocabulary",
            total_terms,
            counts.len()
        );

        let mut vector = SparseVector::from_pairs(counts);
        let indices = vector.indices().to_vec();
        for (value, col) in vector.values_mut().iter_mut().zip(indices) {
            if self.binary {
                *value = 1.0;
            }
            if self.sublinear_tf {
                *value = 1.0 + value.ln();
            }
            if let Some(idf) = &self.idf {
                *value *= idf[col];
            }
        }

        let length = match self.norm {
            Norm::L2 => vector.norm(),
            Norm::L1 => vector.values().iter().map(|v| v.abs()).sum(),
            Norm::Off => 0.0,
        };
        if length > 0.0 {
            vector.scale(1.0 / length);
        }

        vector
    }
}
