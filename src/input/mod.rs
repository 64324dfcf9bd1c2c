//! Input processing module
//! Handles file detection, PDF text extraction, and upload validation

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
