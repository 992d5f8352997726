// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Layout parsing of single images through a scripted backend

use crate::support::{parser, sample_png, FakeBackend, LAYOUT_RESPONSE};
use dots_ocr::{Category, OcrError, PromptMode};
use image::{Rgb, RgbImage};
use tempfile::TempDir;

#[tokio::test]
async fn test_parse_file_writes_all_layout_outputs() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "report.png");
    let out = dir.path().join("out");
    let parser = parser(FakeBackend::new(LAYOUT_RESPONSE), &out);

    let results = parser.parse_file(&input).await.unwrap();
    assert_eq!(results.len(), 1);

    let page = &results[0];
    assert_eq!(page.page_no, 0);
    assert_eq!(page.file_path, input);
    assert_eq!((page.input_width, page.input_height), (280, 140));
    assert!(!page.filtered);

    let save_dir = out.join("report");
    assert_eq!(page.layout_info_path.as_deref(), Some(save_dir.join("report.json").as_path()));
    assert_eq!(page.layout_image_path.as_deref(), Some(save_dir.join("report.jpg").as_path()));
    assert_eq!(page.md_content_path.as_deref(), Some(save_dir.join("report.md").as_path()));
    assert_eq!(
        page.md_content_nohf_path.as_deref(),
        Some(save_dir.join("report_nohf.md").as_path())
    );
    assert!(save_dir.join("report.jpg").is_file());

    let calls = parser.backend().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, PromptMode::LayoutAllEn.prompt());
}

#[tokio::test]
async fn test_cells_round_trip_through_json() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "report.png");
    let parser = parser(FakeBackend::new(LAYOUT_RESPONSE), &dir.path().join("out"));

    let page = parser.parse_file(&input).await.unwrap().remove(0);
    let cells = page.load_cells().unwrap();
    assert_eq!(cells.len(), 6);
    assert_eq!(cells[0].category, Category::PageHeader);
    assert_eq!(cells[1].bbox, [10.0, 30.0, 270.0, 50.0]);
    assert_eq!(cells[4].category, Category::Picture);
    assert!(cells[4].text.is_none());
}

#[tokio::test]
async fn test_markdown_formats_formulas_and_pictures() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "report.png");
    let parser = parser(FakeBackend::new(LAYOUT_RESPONSE), &dir.path().join("out"));

    let page = parser.parse_file(&input).await.unwrap().remove(0);
    let md = page.load_markdown().unwrap().unwrap();
    assert!(md.starts_with("Annual Report\n\n# 年度报告 Overview"));
    assert!(md.contains("$$\nE = mc^2\n$$"));
    assert!(md.contains("![](data:image/png;base64,"));
    assert!(md.ends_with("Page 1"));

    let nohf = page.load_markdown_nohf().unwrap().unwrap();
    assert!(nohf.starts_with("# 年度报告 Overview"));
    assert!(!nohf.contains("Annual Report"));
    assert!(!nohf.contains("Page 1"));
}

#[tokio::test]
async fn test_bboxes_scaled_back_to_original_size() {
    let dir = TempDir::new().unwrap();
    // 300x150 is resized to 308x140 for the model
    let input = dir.path().join("odd.png");
    RgbImage::from_pixel(300, 150, Rgb([255, 255, 255]))
        .save(&input)
        .unwrap();
    let response = r#"[{"bbox": [0, 0, 308, 140], "category": "Text", "text": "all"}]"#;
    let parser = parser(FakeBackend::new(response), &dir.path().join("out"));

    let page = parser.parse_file(&input).await.unwrap().remove(0);
    assert_eq!((page.input_width, page.input_height), (308, 140));

    let calls = parser.backend().calls();
    assert_eq!((calls[0].width, calls[0].height), (308, 140));

    let cells = page.load_cells().unwrap();
    assert_eq!(cells[0].bbox, [0.0, 0.0, 300.0, 150.0]);
}

#[tokio::test]
async fn test_fenced_response_is_accepted() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "fenced.png");
    let response = format!("```json\n{}\n```", LAYOUT_RESPONSE);
    let parser = parser(FakeBackend::new(&response), &dir.path().join("out"));

    let page = parser.parse_file(&input).await.unwrap().remove(0);
    assert!(!page.filtered);
    assert_eq!(page.load_cells().unwrap().len(), 6);
}

#[tokio::test]
async fn test_unparseable_layout_is_filtered() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "broken.png");
    let raw = "The page shows a chart [truncated";
    let parser = parser(FakeBackend::new(raw), &dir.path().join("out"));

    let page = parser.parse_file(&input).await.unwrap().remove(0);
    assert!(page.filtered);
    assert!(page.layout_image_path.is_none());
    assert!(page.md_content_nohf_path.is_none());
    assert!(page.load_cells().unwrap().is_empty());
    assert_eq!(page.load_markdown().unwrap().as_deref(), Some(raw));

    let json = std::fs::read_to_string(page.layout_info_path.as_ref().unwrap()).unwrap();
    let stored: String = serde_json::from_str(&json).unwrap();
    assert_eq!(stored, raw);
}

#[tokio::test]
async fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let parser = parser(FakeBackend::new("[]"), dir.path());

    let err = parser
        .parse_file(dir.path().join("nope.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, OcrError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    assert!(parser.backend().calls().is_empty());
}

#[tokio::test]
async fn test_non_image_input_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "just some notes").unwrap();
    let parser = parser(FakeBackend::new("[]"), &dir.path().join("out"));

    let err = parser.parse_file(&input).await.unwrap_err();
    assert!(matches!(err, OcrError::UnsupportedInput(_)));
}

#[tokio::test]
async fn test_backend_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "page.png");
    let parser = parser(FakeBackend::failing("CUDA out of memory"), &dir.path().join("out"));

    let err = parser.parse_file(&input).await.unwrap_err();
    match err {
        OcrError::Server { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("out of memory"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}
