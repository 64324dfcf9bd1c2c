//! Resume documents and the matching pipeline

pub mod document;
pub mod matcher;
