//! Integration tests for pdf-core
//!
//! These tests exercise logo embedding and PDF inspection without a browser.

use lopdf::dictionary;
use pdf_core::{embed_logo, inspect_pdf, LogoAsset, LogoFormat, PdfError, LOGO_PLACEHOLDER};

/// Create a minimal valid PDF with A4 pages for testing
fn create_test_pdf_with_pages(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..page_count {
        let contents_id = doc.add_object(lopdf::Stream::new(lopdf::dictionary! {}, vec![]));
        let page_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()],
            "Resources" => lopdf::dictionary! {},
            "Contents" => contents_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        lopdf::Object::Dictionary(lopdf::dictionary! {
            "Type" => "Pages",
            "Count" => page_count as i64,
            "Kids" => kids,
        }),
    );

    let catalog_id = doc.add_object(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

#[test]
fn test_inspect_single_page_pdf() {
    let bytes = create_test_pdf_with_pages(1);
    let summary = inspect_pdf(&bytes).unwrap();
    assert_eq!(summary.page_count, 1);
    assert_eq!(summary.version, "1.5");
    assert_eq!(summary.size, bytes.len());
}

#[test]
fn test_inspect_multi_page_pdf() {
    let bytes = create_test_pdf_with_pages(3);
    assert_eq!(inspect_pdf(&bytes).unwrap().page_count, 3);
}

#[test]
fn test_inspect_rejects_html() {
    let err = inspect_pdf(b"<!DOCTYPE html><html></html>").unwrap_err();
    assert!(matches!(err, PdfError::InvalidOutput(_)));
}

#[test]
fn test_logo_embedding_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.svg");
    std::fs::write(
        &path,
        r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="4" height="4"/></svg>"#,
    )
    .unwrap();

    let logo = LogoAsset::load(&path);
    assert_eq!(logo.as_ref().map(|l| l.format()), Some(LogoFormat::Svg));

    let html = format!(r#"<header><img {LOGO_PLACEHOLDER} alt="Agenzia"></header>"#);
    let embedded = embed_logo(html, logo.as_ref());
    assert!(embedded.contains(r#"<img src="data:image/svg+xml;base64,"#));
    assert!(embedded.contains(r#"alt="Agenzia""#));
}

#[test]
fn test_missing_logo_leaves_html_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let logo = LogoAsset::load(dir.path().join("missing.svg"));
    assert!(logo.is_none());

    let html = r#"<img src="logo.png">"#.to_string();
    assert_eq!(embed_logo(html.clone(), logo.as_ref()), html);
}
