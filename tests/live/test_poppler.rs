// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Requires pdftoppm/pdfinfo on PATH and a PDF at DOTS_OCR_TEST_PDF

use crate::support::{parser, FakeBackend};
use dots_ocr::pdf::{PdfInfo, PdfRenderer};
use dots_ocr::{ParseOptions, PromptMode};
use std::path::PathBuf;
use tempfile::TempDir;

fn test_pdf() -> PathBuf {
    PathBuf::from(std::env::var("DOTS_OCR_TEST_PDF").expect("set DOTS_OCR_TEST_PDF"))
}

#[tokio::test]
#[ignore]
async fn test_render_first_page() {
    let renderer = PdfRenderer::new();
    let pdf = test_pdf();
    let count = renderer.page_count(&pdf).await.unwrap();
    assert!(count > 0);

    let pages = renderer.render_pages(&pdf, 72, Some(0..1)).await.unwrap();
    assert_eq!(pages.len(), 1);

    let info = PdfInfo::inspect(&renderer, &pdf, 200).await.unwrap();
    assert_eq!(info.page_count, count);
    assert_eq!(info.estimated_processing_secs, count as u64 * 10);
}

#[tokio::test]
#[ignore]
async fn test_pages_named_and_sorted() {
    let dir = TempDir::new().unwrap();
    let pdf = test_pdf();
    let parser = parser(FakeBackend::new("text"), dir.path());

    let options = ParseOptions::new(PromptMode::Ocr).with_page_range(0..2);
    let pages = parser.parse_file_with(&pdf, &options).await.unwrap();
    let numbers: Vec<usize> = pages.iter().map(|p| p.page_no).collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    assert_eq!(numbers, sorted);

    let stem = pdf.file_stem().unwrap().to_string_lossy().to_string();
    let first = pages[0].md_content_path.as_ref().unwrap();
    assert_eq!(
        first.file_name().unwrap().to_string_lossy(),
        format!("{}_page_0.md", stem)
    );
}
