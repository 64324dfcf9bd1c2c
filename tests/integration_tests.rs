//! Integration tests for the resume job matcher

mod common;

use approx::assert_relative_eq;
use common::{bundle_for, pdf_with_pages, write_bundle, write_pdf, JOBS};
use resume_job_matcher::config::OutputFormat;
use resume_job_matcher::input::manager::InputManager;
use resume_job_matcher::input::text_extractor::PdfExtractor;
use resume_job_matcher::output::formatter::ReportGenerator;
use resume_job_matcher::processing::matcher::MatchParams;
use resume_job_matcher::session::MatchSession;
use resume_job_matcher::{JobMatcherError, Matcher, ModelArtifact};
use std::collections::HashSet;

#[tokio::test]
async fn test_text_extraction_keeps_page_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "resume.pdf", &[&["Alpha"], &[], &["Omega"]]);

    let extracted = PdfExtractor.extract(&path).await.unwrap();
    assert_eq!(extracted.text, "AlphaOmega");
    assert_eq!(extracted.page_count, 3);
    assert_eq!(extracted.empty_pages, 1);
}

#[test]
fn test_word_split_across_pages_is_one_token() {
    let bytes = pdf_with_pages(&[&["kuber"], &["netes"]]);
    let extracted = PdfExtractor.extract_from_bytes(&bytes).unwrap();
    assert_eq!(extracted.text, "kubernetes");

    let artifact = ModelArtifact::from_bundle(bundle_for(&[("Platform Engineer", "kubernetes")])).unwrap();
    let scores = Matcher::new(&artifact).score(&extracted.text).unwrap();
    assert_relative_eq!(scores[0], 100.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_corrupt_pdf_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is a plain text file renamed to .pdf").unwrap();

    let result = InputManager::new().load_resume(&path).await;
    assert!(matches!(result, Err(JobMatcherError::DocumentParse(_))));
}

#[tokio::test]
async fn test_missing_and_unsupported_files() {
    let dir = tempfile::tempdir().unwrap();
    let manager = InputManager::new();

    let missing = manager.load_resume(&dir.path().join("missing.pdf")).await;
    assert!(matches!(missing, Err(JobMatcherError::InvalidInput(_))));

    let docx = dir.path().join("resume.docx");
    std::fs::write(&docx, b"PK\x03\x04").unwrap();
    let unsupported = manager.load_resume(&docx).await;
    assert!(matches!(unsupported, Err(JobMatcherError::UnsupportedFormat(_))));
}

#[test]
fn test_artifact_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bundle(dir.path(), &bundle_for(JOBS));

    let artifact = ModelArtifact::load(&path).unwrap();
    assert_eq!(artifact.source(), Some(path.as_path()));
    assert_eq!(artifact.jobs().len(), JOBS.len());
    assert_eq!(
        artifact.distinct_roles(),
        vec!["Backend Engineer", "Data Analyst", "Frontend Developer"]
    );
}

#[test]
fn test_artifact_with_mismatched_rows_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut bundle = bundle_for(JOBS);
    bundle.jobs.pop();
    let path = write_bundle(dir.path(), &bundle);

    assert!(matches!(ModelArtifact::load(&path), Err(JobMatcherError::ArtifactLoad(_))));
}

#[test]
fn test_identical_text_scores_one_hundred() {
    let artifact = ModelArtifact::from_bundle(bundle_for(JOBS)).unwrap();
    let scores = Matcher::new(&artifact).score(JOBS[3].1).unwrap();

    assert_relative_eq!(scores[3], 100.0, epsilon = 1e-9);
    assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
}

#[tokio::test]
async fn test_upload_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_bundle(dir.path(), &bundle_for(JOBS));
    let artifact = ModelArtifact::load(&model_path).unwrap();

    let resume = write_pdf(
        dir.path(),
        "jane.pdf",
        &[&["Jane Doe", "Rust engineer: tokio, kafka, kubernetes"], &["SQL reporting"]],
    );

    let session = MatchSession::new(&artifact, MatchParams::new(8, 1.0).unwrap());
    let report = session.upload(&resume).await.unwrap();

    assert!(report.has_matches());
    assert_eq!(report.matches[0].role, "Backend Engineer");
    assert_eq!(report.metadata.page_count, 2);

    let roles: HashSet<&str> = report.matches.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles.len(), report.matches.len());
    assert!(report
        .matches
        .windows(2)
        .all(|pair| pair[0].match_score >= pair[1].match_score));
    assert!(report.summary.duplicates_dropped >= 1);

    let json = ReportGenerator::new(false, false, 80)
        .generate_report(&report, &OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["matches"][0]["Role"], "Backend Engineer");
}

#[tokio::test]
async fn test_uploads_do_not_share_results() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = ModelArtifact::from_bundle(bundle_for(JOBS)).unwrap();
    let session = MatchSession::new(&artifact, MatchParams::new(8, 1.0).unwrap());

    let backend = write_pdf(dir.path(), "backend.pdf", &[&["rust grpc kafka kubernetes"]]);
    let frontend = write_pdf(dir.path(), "frontend.pdf", &[&["react typescript css"]]);

    let first = session.upload(&backend).await.unwrap();
    let second = session.upload(&frontend).await.unwrap();
    let again = session.upload(&backend).await.unwrap();

    assert_eq!(first.matches[0].role, "Backend Engineer");
    assert_eq!(second.matches[0].role, "Frontend Developer");
    assert_eq!(first.matches, again.matches);
}

#[tokio::test]
async fn test_unrelated_resume_yields_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = ModelArtifact::from_bundle(bundle_for(JOBS)).unwrap();
    let session = MatchSession::new(&artifact, MatchParams::default());

    let resume = write_pdf(dir.path(), "chef.pdf", &[&["pastry chef sourdough croissants"]]);
    let report = session.upload(&resume).await.unwrap();

    assert!(!report.has_matches());
    assert_eq!(report.summary.best_score, 0.0);

    let html = ReportGenerator::new(false, false, 80)
        .generate_report(&report, &OutputFormat::Html)
        .unwrap();
    assert!(html.contains("No job matches"));
}
