//! Resume job matcher library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod processing;
pub mod session;

pub use config::Config;
pub use error::{JobMatcherError, Result};
pub use model::ModelArtifact;
pub use processing::matcher::{MatchParams, MatchResults, Matcher};
