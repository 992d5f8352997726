// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Parser behaviour verified against mockall expectations

use crate::support::{config, sample_png};
use async_trait::async_trait;
use dots_ocr::{DotsOcrParser, OcrBackend, ParseOptions, PromptMode, Result};
use image::{DynamicImage, GenericImageView};
use mockall::{mock, predicate::*};
use tempfile::TempDir;

mock! {
    pub Backend {}

    #[async_trait]
    impl OcrBackend for Backend {
        async fn infer(&self, image: &DynamicImage, prompt: &str) -> Result<String>;
        fn model_name(&self) -> String;
    }
}

#[tokio::test]
async fn test_backend_called_once_per_image() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");

    let mut backend = MockBackend::new();
    backend
        .expect_infer()
        .withf(|image, prompt| image.dimensions() == (280, 140) && prompt == PromptMode::Ocr.prompt())
        .times(1)
        .returning(|_, _| Ok("hello".to_string()));
    backend.expect_model_name().return_const("model".to_string());

    let parser = DotsOcrParser::with_backend(backend, config(&dir.path().join("out")));
    assert_eq!(parser.backend().model_name(), "model");

    let pages = parser
        .parse_file_with(&input, &ParseOptions::new(PromptMode::Ocr))
        .await
        .unwrap();
    assert_eq!(pages[0].load_markdown().unwrap().as_deref(), Some("hello"));
}

#[test]
fn test_rejected_options_never_reach_backend() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");

    let mut backend = MockBackend::new();
    backend.expect_infer().never();

    let parser = DotsOcrParser::with_backend(backend, config(&dir.path().join("out")));
    let options = ParseOptions::new(PromptMode::GroundingOcr);
    let result = tokio_test::block_on(parser.parse_file_with(&input, &options));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_grounding_prompt_matches_region() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");

    let mut backend = MockBackend::new();
    backend
        .expect_infer()
        .with(always(), mockall::predicate::str::ends_with("[10, 20, 110, 60]"))
        .times(1)
        .returning(|_, _| Ok("Total: 42".to_string()));

    let parser = DotsOcrParser::with_backend(backend, config(&dir.path().join("out")));
    let pages = parser
        .parse_file_with(&input, &ParseOptions::grounding([10.0, 20.0, 110.0, 60.0]))
        .await
        .unwrap();
    assert_eq!(pages.len(), 1);
}
