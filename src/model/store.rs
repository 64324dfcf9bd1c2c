//! Process-wide model cache
//!
//! The artifact is loaded on first use and lives until the process exits.
//! Concurrent first callers block on a single load; later callers get the
//! same shared reference without locking.

use crate::error::{JobMatcherError, Result};
use crate::model::artifact::ModelArtifact;
use log::debug;
use once_cell::sync::OnceCell;
use std::path::Path;

static SHARED: OnceCell<ModelArtifact> = OnceCell::new();

/// Load the artifact at `path` once per process and return it.
///
/// A failed load leaves the cache empty, so a later call may retry. Asking
/// for a different path after a successful load is a configuration error.
pub fn shared(path: &Path) -> Result<&'static ModelArtifact> {
    let artifact = SHARED.get_or_try_init(|| ModelArtifact::load(path))?;

    match artifact.source() {
        Some(source) if source != path => Err(JobMatcherError::Configuration(format!(
            "model artifact already loaded from '{}', cannot switch to '{}'",
            source.display(),
            path.display()
        ))),
        _ => {
            debug!("Using shared model artifact");
            Ok(artifact)
        }
    }
}

/// The shared artifact, if one has been loaded.
pub fn loaded() -> Option<&'static ModelArtifact> {
    SHARED.get()
}
