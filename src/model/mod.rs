//! Model artifact: feature space, job matrix and the shared cache

pub mod artifact;
pub mod matrix;
pub mod store;
pub mod vectorizer;

pub use artifact::{ArtifactBundle, JobPosting, ModelArtifact};
pub use matrix::{CsrMatrix, JobMatrix, SparseVector};
pub use vectorizer::{Norm, TermVectorizer, VectorizerSpec};
