// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Output files and prompts for each prompt mode

use crate::support::{parser, sample_png, FakeBackend, LAYOUT_RESPONSE};
use dots_ocr::{OcrError, ParseOptions, PromptMode};
use image::{Rgb, RgbImage};
use tempfile::TempDir;

#[tokio::test]
async fn test_layout_only_writes_no_markdown() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "scan.png");
    let parser = parser(FakeBackend::new(LAYOUT_RESPONSE), &dir.path().join("out"));

    let options = ParseOptions::new(PromptMode::LayoutOnlyEn);
    let page = parser.parse_file_with(&input, &options).await.unwrap().remove(0);

    assert!(page.has_layout());
    assert!(page.layout_image_path.is_some());
    assert!(!page.has_text());
    assert!(page.md_content_nohf_path.is_none());
    assert_eq!(parser.backend().calls()[0].prompt, PromptMode::LayoutOnlyEn.prompt());
}

#[tokio::test]
async fn test_ocr_mode_keeps_raw_text() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "scan.png");
    let text = "Line one\n\n| a | b |\n|---|---|\n| 1 | 2 |";
    let parser = parser(FakeBackend::new(text), &dir.path().join("out"));

    let options = ParseOptions::new(PromptMode::Ocr);
    let page = parser.parse_file_with(&input, &options).await.unwrap().remove(0);

    assert!(!page.has_layout());
    assert!(!page.filtered);
    assert_eq!(page.load_markdown().unwrap().as_deref(), Some(text));
    assert_eq!(
        page.md_content_path.as_deref(),
        Some(dir.path().join("out/scan/scan.md").as_path())
    );
}

#[tokio::test]
async fn test_grounding_prompt_uses_input_coordinates() {
    let dir = TempDir::new().unwrap();
    // resized to 308x140 for the model
    let input = dir.path().join("wide.png");
    RgbImage::from_pixel(300, 150, Rgb([255, 255, 255]))
        .save(&input)
        .unwrap();
    let parser = parser(FakeBackend::new("  Region text \n"), &dir.path().join("out"));

    let options = ParseOptions::grounding([30.0, 15.0, 150.0, 75.0]);
    let page = parser.parse_file_with(&input, &options).await.unwrap().remove(0);

    let prompt = &parser.backend().calls()[0].prompt;
    assert!(prompt.starts_with(PromptMode::GroundingOcr.prompt()));
    assert!(prompt.ends_with("[31, 14, 154, 70]"), "prompt was {:?}", prompt);
    assert_eq!(page.load_markdown().unwrap().as_deref(), Some("  Region text \n"));
}

#[tokio::test]
async fn test_grounding_without_bbox_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "scan.png");
    let parser = parser(FakeBackend::new(""), &dir.path().join("out"));

    let options = ParseOptions::new(PromptMode::GroundingOcr);
    let err = parser.parse_file_with(&input, &options).await.unwrap_err();
    assert!(matches!(err, OcrError::InvalidBbox(ref v) if v.is_empty()));
    assert!(parser.backend().calls().is_empty());
}

#[tokio::test]
async fn test_inverted_bbox_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "scan.png");
    let parser = parser(FakeBackend::new(""), &dir.path().join("out"));

    let options = ParseOptions::grounding([100.0, 10.0, 20.0, 50.0]);
    let err = parser.parse_file_with(&input, &options).await.unwrap_err();
    assert!(matches!(err, OcrError::InvalidBbox(ref v) if v == &vec![100.0, 10.0, 20.0, 50.0]));
}

#[tokio::test]
async fn test_fitz_preprocess_resamples_at_dpi() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "scan.png");
    let parser = parser(FakeBackend::new("text"), &dir.path().join("out"));

    let options = ParseOptions::new(PromptMode::Ocr).with_fitz_preprocess(true);
    parser.parse_file_with(&input, &options).await.unwrap();

    // 280x140 points at 200 DPI is about 778x389, snapped to the 28px grid
    let call = &parser.backend().calls()[0];
    assert_eq!((call.width, call.height), (784, 392));
}

#[tokio::test]
async fn test_pixel_limits_shrink_model_input() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "scan.png");
    let mut parser = parser(FakeBackend::new("text"), &dir.path().join("out"));
    parser.set_pixel_limits(None, Some(3136 * 4)).unwrap();

    parser
        .parse_file_with(&input, &ParseOptions::new(PromptMode::Ocr))
        .await
        .unwrap();
    let call = &parser.backend().calls()[0];
    assert!(call.width * call.height <= 3136 * 4);
    assert_eq!(call.width % 28, 0);
    assert_eq!(call.height % 28, 0);

    assert!(parser.set_pixel_limits(Some(100), None).is_err());
}
