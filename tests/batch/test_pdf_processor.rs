// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// PDF processing statistics without a poppler install

use crate::support::{parser, FakeBackend};
use dots_ocr::batch::FileStatus;
use dots_ocr::pdf::PdfRenderer;
use dots_ocr::{OcrError, PdfProcessor, PromptMode};
use tempfile::TempDir;

fn processor_without_poppler(dir: &TempDir) -> PdfProcessor<FakeBackend> {
    let parser = parser(FakeBackend::new("[]"), &dir.path().join("out"))
        .with_renderer(PdfRenderer::with_tool_dir(dir.path().join("no-poppler")));
    PdfProcessor::new(parser)
}

#[tokio::test]
async fn test_missing_poppler_reports_pdf_tool_error() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("doc.pdf");
    std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();
    let mut processor = processor_without_poppler(&dir);

    let err = processor.parse_pdf(&pdf, PromptMode::LayoutAllEn).await.unwrap_err();
    assert!(matches!(err, OcrError::PdfTool(_)));
    assert!(err.remediation().unwrap_or_default().contains("poppler"));

    let stats = processor.stats();
    assert_eq!(stats.total_files, 1);
    assert_eq!(stats.successful_pages, 0);
    assert_eq!(stats.success_rate(), 0.0);
}

#[tokio::test]
async fn test_batch_process_records_each_pdf() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    std::fs::write(&a, b"%PDF-1.4\n").unwrap();
    std::fs::write(&b, b"%PDF-1.4\n").unwrap();
    let mut processor = processor_without_poppler(&dir);

    let results = processor.batch_process(&[a.clone(), b], PromptMode::LayoutAllEn).await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.status == FileStatus::Error));
    assert_eq!(results[0].file_path, a);
    assert!(results[0].merged_info.is_none());
    assert_eq!(processor.stats().total_files, 2);
}

#[tokio::test]
async fn test_empty_page_range_rejected() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("doc.pdf");
    std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();
    let mut processor = processor_without_poppler(&dir);

    let err = processor
        .parse_pages_range(&pdf, 3, 3, PromptMode::Ocr)
        .await
        .unwrap_err();
    assert!(matches!(err, OcrError::Config(_)));
}
