// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Directory scanning and batch summaries

use crate::support::{parser, sample_png, FakeBackend, LAYOUT_RESPONSE};
use dots_ocr::batch::{scan_directory, BatchSummary, FileStatus};
use dots_ocr::{BatchProcessor, PromptMode};
use tempfile::TempDir;

#[test]
fn test_scan_directory_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
    std::fs::write(dir.path().join("a.PNG"), b"x").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub/c.pdf"), b"x").unwrap();

    let flat = scan_directory(dir.path(), false).unwrap();
    assert_eq!(flat, vec![dir.path().join("a.PNG"), dir.path().join("b.jpg")]);

    let deep = scan_directory(dir.path(), true).unwrap();
    assert_eq!(deep.len(), 3);
    assert_eq!(deep[2], dir.path().join("sub/c.pdf"));
}

#[tokio::test]
async fn test_failures_are_recorded_not_raised() {
    let dir = TempDir::new().unwrap();
    let good = sample_png(dir.path(), "good.png");
    let bad = dir.path().join("missing.png");

    let mut processor = BatchProcessor::new(parser(
        FakeBackend::new(LAYOUT_RESPONSE),
        &dir.path().join("out"),
    ));
    let results = processor
        .process_file_list(&[good.clone(), bad.clone()], PromptMode::LayoutAllEn)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, FileStatus::Success);
    assert_eq!(results[0].page_count, 1);
    assert_eq!(results[1].status, FileStatus::Error);
    assert!(results[1].error.as_deref().unwrap().contains("missing.png"));
    assert_eq!(processor.results().len(), 2);
}

#[tokio::test]
async fn test_process_directory_and_save_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("inputs");
    std::fs::create_dir(&inputs).unwrap();
    sample_png(&inputs, "one.png");
    sample_png(&inputs, "two.png");
    std::fs::write(inputs.join("readme.md"), "skip me").unwrap();

    let out = dir.path().join("out");
    let mut processor = BatchProcessor::new(parser(FakeBackend::new("text"), &out));
    let results = processor
        .process_directory(&inputs, PromptMode::Ocr, false)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(processor.parser().backend().calls().len(), 2);

    let summary_path = out.join("batch_summary.json");
    let summary = processor.save_summary(&summary_path).unwrap();
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.successful_files, 2);
    assert_eq!(summary.failed_files, 0);
    assert_eq!(summary.total_pages, 2);

    let saved: BatchSummary =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(saved, summary);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(raw["results"][0]["status"], "success");
}

#[tokio::test]
async fn test_empty_directory_yields_no_results() {
    let dir = TempDir::new().unwrap();
    let mut processor = BatchProcessor::new(parser(FakeBackend::new("text"), dir.path()));
    let results = processor
        .process_directory(dir.path(), PromptMode::Ocr, true)
        .await
        .unwrap();
    assert!(results.is_empty());
    assert_eq!(processor.summary().total_files, 0);
}
