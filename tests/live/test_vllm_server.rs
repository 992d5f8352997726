// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Requires DotsOCR served at DOTS_OCR_IP:DOTS_OCR_PORT (default localhost:8000)

use crate::support::sample_png;
use dots_ocr::{DotsOcrParser, ParseOptions, ParserConfig, PromptMode, VlmClient};
use std::time::Duration;
use tempfile::TempDir;

fn live_config(output_dir: &std::path::Path) -> ParserConfig {
    let mut config = ParserConfig::from_env().unwrap();
    config.output_dir = output_dir.to_path_buf();
    config
}

#[tokio::test]
#[ignore]
async fn test_server_health_and_models() {
    let dir = TempDir::new().unwrap();
    let client = VlmClient::from_config(&live_config(dir.path())).unwrap();
    assert!(client.wait_for_server(Duration::from_secs(30), Duration::from_secs(2)).await);

    let models = client.list_models().await.unwrap();
    assert!(!models.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_parse_image_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "blank.png");
    let parser = DotsOcrParser::new(live_config(&dir.path().join("out"))).unwrap();

    let pages = parser.parse_file(&input).await.unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].has_layout());

    let ocr = parser
        .parse_file_with(&input, &ParseOptions::new(PromptMode::Ocr))
        .await
        .unwrap();
    assert!(ocr[0].has_text());
}
