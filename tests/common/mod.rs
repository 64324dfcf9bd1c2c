//! Shared fixtures for integration tests: model bundles and small PDFs.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use resume_job_matcher::model::artifact::FORMAT_VERSION;
use resume_job_matcher::model::{ArtifactBundle, CsrMatrix, JobPosting, SparseVector, TermVectorizer, VectorizerSpec};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const JOBS: &[(&str, &str)] = &[
    ("Backend Engineer", "rust tokio postgres kubernetes microservices"),
    ("Data Analyst", "sql excel tableau dashboards reporting"),
    ("Backend Engineer", "rust grpc kafka kubernetes"),
    ("Frontend Developer", "react typescript css accessibility"),
    ("Data Analyst", "sql python pandas reporting"),
];

/// Plain-tf, l2-normalized bundle over every term in `jobs`.
pub fn bundle_for(jobs: &[(&str, &str)]) -> ArtifactBundle {
    let probe = TermVectorizer::from_spec(VectorizerSpec::with_vocabulary(HashMap::new())).unwrap();

    let mut vocabulary = HashMap::new();
    for (_, features) in jobs {
        for term in probe.analyze(features) {
            let next = vocabulary.len();
            vocabulary.entry(term).or_insert(next);
        }
    }

    let spec = VectorizerSpec::with_vocabulary(vocabulary);
    let vectorizer = TermVectorizer::from_spec(spec.clone()).unwrap();
    let rows: Vec<SparseVector> = jobs.iter().map(|(_, f)| vectorizer.transform(f)).collect();

    ArtifactBundle {
        format_version: FORMAT_VERSION,
        vectorizer: spec,
        job_matrix: CsrMatrix::from_rows(&rows, vectorizer.n_features()),
        jobs: jobs.iter().map(|(role, f)| JobPosting::new(*role, *f)).collect(),
    }
}

pub fn write_bundle(dir: &Path, bundle: &ArtifactBundle) -> PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, serde_json::to_vec(bundle).unwrap()).unwrap();
    path
}

/// A PDF with one page per entry; an empty entry yields a page with an
/// empty content stream.
pub fn pdf_with_pages(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        if !lines.is_empty() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("TL", vec![16.into()]));
            operations.push(Operation::new("Td", vec![72.into(), 720.into()]));
            for line in lines.iter() {
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_with_pages(pages)).unwrap();
    path
}
