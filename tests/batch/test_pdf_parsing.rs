// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// PDF parsing end to end with stand-in poppler tools

#![cfg(unix)]

use crate::support::{config, fake_poppler, render_log, sample_pdf, FakeBackend, LAYOUT_RESPONSE};
use dots_ocr::batch::FileStatus;
use dots_ocr::{DotsOcrParser, ParseOptions, ParserConfig, PdfProcessor, PromptMode};
use std::path::Path;
use tempfile::TempDir;

fn pdf_parser(dir: &Path, pages: usize, num_thread: usize) -> DotsOcrParser<FakeBackend> {
    let parser_config = ParserConfig {
        num_thread,
        ..config(&dir.join("out"))
    };
    DotsOcrParser::with_backend(FakeBackend::new(LAYOUT_RESPONSE), parser_config)
        .with_renderer(fake_poppler(&dir.join("poppler"), pages))
}

#[tokio::test]
async fn test_page_range_keeps_document_page_numbers() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(dir.path(), "doc.pdf");
    let parser = pdf_parser(dir.path(), 12, 2);

    let options = ParseOptions::new(PromptMode::LayoutAllEn).with_page_range(8..11);
    let pages = parser.parse_file_with(&pdf, &options).await.unwrap();

    let page_nos: Vec<usize> = pages.iter().map(|p| p.page_no).collect();
    assert_eq!(page_nos, vec![8, 9, 10]);
    let names: Vec<String> = pages
        .iter()
        .map(|p| {
            let md = p.md_content_path.as_ref().unwrap();
            md.file_name().unwrap().to_string_lossy().into_owned()
        })
        .collect();
    assert_eq!(names, ["doc_page_8.md", "doc_page_9.md", "doc_page_10.md"]);
    assert!(dir.path().join("out/doc/doc_page_10_nohf.md").exists());
    assert!(pages.iter().all(|p| p.file_path == pdf && !p.filtered));
    assert_eq!(parser.backend().calls().len(), 3);
}

#[tokio::test]
async fn test_pages_rendered_in_worker_sized_chunks() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(dir.path(), "doc.pdf");
    let parser = pdf_parser(dir.path(), 12, 2);

    let options = ParseOptions::new(PromptMode::Ocr).with_page_range(8..11);
    parser.parse_file_with(&pdf, &options).await.unwrap();

    // 1-based first/last page per pdftoppm run
    assert_eq!(render_log(&dir.path().join("poppler")), ["9 10", "11 11"]);
}

#[tokio::test]
async fn test_page_range_clipped_to_document() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(dir.path(), "doc.pdf");
    let parser = pdf_parser(dir.path(), 3, 4);

    let options = ParseOptions::new(PromptMode::Ocr).with_page_range(1..50);
    let pages = parser.parse_file_with(&pdf, &options).await.unwrap();
    let page_nos: Vec<usize> = pages.iter().map(|p| p.page_no).collect();
    assert_eq!(page_nos, vec![1, 2]);
    assert_eq!(render_log(&dir.path().join("poppler")), ["2 3"]);
}

#[tokio::test]
async fn test_process_document_merges_and_analyzes() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(dir.path(), "doc.pdf");
    let mut processor = PdfProcessor::new(pdf_parser(dir.path(), 12, 4));

    let report = processor
        .process_document(&pdf, PromptMode::LayoutAllEn)
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 12);
    assert_eq!(report.merged_info.total_pages, 12);
    assert_eq!(report.merged_info.total_layout_elements, 72);
    assert!(report.merged_paths.text.exists());
    assert_eq!(
        report.merged_paths.layout,
        dir.path().join("out/doc/doc_merged_layout.json")
    );

    let expected_dir = dir
        .path()
        .join("out/doc")
        .join(format!("structured_{}", report.session_id));
    assert_eq!(report.structured_dir, expected_dir);
    assert!(expected_dir.join("english_content.md").exists());
    assert!(expected_dir.join("analysis_report.txt").exists());

    let stats = processor.stats();
    assert_eq!(stats.total_pages, 12);
    assert_eq!(stats.successful_pages, 12);
    assert_eq!(stats.success_rate(), 100.0);
}

#[tokio::test]
async fn test_batch_process_reports_failed_merge_as_error() {
    let dir = TempDir::new().unwrap();
    let good = sample_pdf(dir.path(), "good.pdf");
    let doc = sample_pdf(dir.path(), "doc.pdf");
    // a directory where the merged layout file should go
    std::fs::create_dir_all(dir.path().join("out/doc/doc_merged_layout.json")).unwrap();
    let mut processor = PdfProcessor::new(pdf_parser(dir.path(), 2, 2));

    let results = processor
        .batch_process(&[good, doc], PromptMode::LayoutAllEn)
        .await;

    assert_eq!(results[0].status, FileStatus::Success);
    assert_eq!(results[0].page_count, 2);
    assert!(results[0].merged_info.is_some());
    assert!(dir.path().join("out/good/good_merged_text.md").exists());

    assert_eq!(results[1].status, FileStatus::Error);
    assert!(results[1].merged_info.is_none());
    assert!(results[1].error.as_deref().unwrap().starts_with("merge failed"));
}
