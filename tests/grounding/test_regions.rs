// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Region OCR, detection-driven OCR and result files

use crate::support::{parser, sample_png, FakeBackend, LAYOUT_RESPONSE};
use dots_ocr::grounding::quadrants;
use dots_ocr::{Category, GroundingProcessor, PromptMode};
use image::GenericImageView;
use tempfile::TempDir;

#[tokio::test]
async fn test_ocr_region_trims_text() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");
    let processor = GroundingProcessor::new(parser(
        FakeBackend::new("\n  Invoice #123  \n"),
        &dir.path().join("out"),
    ));

    let text = processor.ocr_region(&input, [0.0, 0.0, 140.0, 70.0]).await.unwrap();
    assert_eq!(text, "Invoice #123");
}

#[tokio::test]
async fn test_bad_region_gets_empty_text() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");
    let processor = GroundingProcessor::new(parser(FakeBackend::new("words"), &dir.path().join("out")));

    let regions = processor
        .ocr_multiple_regions(&input, &[[0.0, 0.0, 140.0, 70.0], [50.0, 50.0, 10.0, 10.0]])
        .await;
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].text, "words");
    assert_eq!(regions[1].text, "");
    assert_eq!(regions[1].bbox, [50.0, 50.0, 10.0, 10.0]);
    assert_eq!(processor.parser().backend().calls().len(), 1);
}

#[tokio::test]
async fn test_quadrants_are_each_read() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");
    let processor = GroundingProcessor::new(parser(FakeBackend::new("q"), &dir.path().join("out")));

    let regions = processor.ocr_multiple_regions(&input, &quadrants(280, 140)).await;
    assert_eq!(regions.len(), 4);
    assert_eq!(regions[3].bbox, [140.0, 70.0, 280.0, 140.0]);
    assert!(regions.iter().all(|r| r.category.is_none() && r.text == "q"));
}

#[tokio::test]
async fn test_detect_then_ocr_default_categories() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");
    let backend = FakeBackend::new(LAYOUT_RESPONSE).with_grounding_reply("read");
    let processor = GroundingProcessor::new(parser(backend, &dir.path().join("out")));

    let regions = processor.detect_then_ocr(&input, None).await.unwrap();
    let categories: Vec<_> = regions.iter().filter_map(|r| r.category.clone()).collect();
    assert_eq!(categories, vec![Category::Title, Category::Text, Category::Formula]);
    assert!(regions.iter().all(|r| r.text == "read"));
    assert_eq!(regions[0].label(0), "Title 1");

    let calls = processor.parser().backend().calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].prompt, PromptMode::LayoutOnlyEn.prompt());
}

#[tokio::test]
async fn test_detect_then_ocr_custom_categories() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");
    let backend = FakeBackend::new(LAYOUT_RESPONSE).with_grounding_reply("");
    let processor = GroundingProcessor::new(parser(backend, &dir.path().join("out")));

    let regions = processor
        .detect_then_ocr(&input, Some(&[Category::Picture][..]))
        .await
        .unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].bbox, [150.0, 95.0, 270.0, 125.0]);
}

#[tokio::test]
async fn test_results_and_visualization_files() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");
    let out = dir.path().join("out");
    let processor = GroundingProcessor::new(parser(FakeBackend::new("cell"), &out));

    let regions = processor
        .ocr_multiple_regions(&input, &[[10.0, 10.0, 100.0, 60.0]])
        .await;

    let (json, txt) = processor.save_results(&input, &regions, None).unwrap();
    assert_eq!(json, out.join("page_grounding_results.json"));
    assert_eq!(txt, out.join("page_grounding_results.txt"));

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(saved["total_regions"], 1);
    assert_eq!(saved["results"][0]["region_id"], 1);
    assert_eq!(saved["results"][0]["text"], "cell");

    let report = std::fs::read_to_string(&txt).unwrap();
    assert!(report.contains("Region 1:"));
    assert!(report.contains("Text: cell"));

    let image_path = processor.visualize_regions(&input, &regions, None).unwrap();
    assert_eq!(image_path, out.join("visualized_page.png"));
    let drawn = image::open(&image_path).unwrap();
    assert_eq!(drawn.dimensions(), (280, 140));
}
