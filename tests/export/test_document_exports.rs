// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Parse a page, then write every derived export next to it

use crate::support::{parser, sample_png, FakeBackend, LAYOUT_RESPONSE};
use dots_ocr::analysis::{analyze_multilingual, analyze_structured_content};
use dots_ocr::export::{
    merge_page_results, save_category_files, save_csv, save_multilingual_results,
    save_structured_results, save_structured_text,
};
use dots_ocr::Category;
use tempfile::TempDir;

#[tokio::test]
async fn test_exports_from_parsed_page() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "report.png");
    let out = dir.path().join("out");
    let parser = parser(FakeBackend::new(LAYOUT_RESPONSE), &out);

    let pages = parser.parse_file(&input).await.unwrap();
    let merged = merge_page_results(&pages);
    assert_eq!(merged.info.total_pages, 1);
    assert_eq!(merged.info.total_layout_elements, 6);
    assert!(merged.text.starts_with("--- Page 1 ---\n\nAnnual Report"));
    assert!(merged.cells.iter().all(|c| c.page_number == Some(1)));
    assert_eq!(merged.info.category_statistics.get("Picture"), Some(&1));

    let base = out.join("report").join("report");

    let csv_path = save_csv(&merged.cells, &base).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 6);
    assert_eq!(&rows[1][0], "Title");
    assert_eq!(&rows[1][2], "# 年度报告 Overview");

    let text_path = save_structured_text(&merged.cells, &base).unwrap();
    let text = std::fs::read_to_string(text_path).unwrap();
    assert!(text.contains("=== Formula ==="));
    assert!(text.contains("Revenue grew in every region."));

    let structured = analyze_structured_content(&merged.cells);
    assert_eq!(structured.total_elements, 6);
    assert_eq!(structured.element_types.formulas, 1);
    assert_eq!(structured.element_types.images, 1);

    let category_files = save_category_files(&structured, &base).unwrap();
    assert!(category_files.contains(&out.join("report/report_formulas.md")));
    assert!(!category_files.contains(&out.join("report/report_tables.html")));

    let multilingual = analyze_multilingual(&merged.cells);
    let paths = save_multilingual_results(&multilingual, &merged.cells, &input, &base).unwrap();
    assert_eq!(paths.analysis_json, out.join("report/report_analysis.json"));
    assert!(paths.report.is_file());
    assert!(paths.language_files.contains(&out.join("report/report_latin.txt")));

    let session_dir = save_structured_results(&structured, "s1", &out.join("report")).unwrap();
    assert_eq!(session_dir, out.join("report/structured_s1"));
    assert!(session_dir.join("analysis_report.txt").is_file());
}

#[tokio::test]
async fn test_merged_document_files() {
    let dir = TempDir::new().unwrap();
    let input = sample_png(dir.path(), "scan.png");
    let out = dir.path().join("out");
    let parser = parser(FakeBackend::new(LAYOUT_RESPONSE), &out);

    let pages = parser.parse_file(&input).await.unwrap();
    let merged = merge_page_results(&pages);
    let paths = merged.save(&out.join("scan/scan")).unwrap();

    assert_eq!(paths.layout, out.join("scan/scan_merged_layout.json"));
    let cells: Vec<dots_ocr::LayoutCell> =
        serde_json::from_str(&std::fs::read_to_string(&paths.layout).unwrap()).unwrap();
    assert_eq!(cells[2].category, Category::Text);
    assert_eq!(cells[2].page_number, Some(1));

    let info: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.info).unwrap()).unwrap();
    assert_eq!(info["total_pages"], 1);
    assert_eq!(info["pages_info"][0]["page_number"], 1);
    assert_eq!(info["pages_info"][0]["has_layout"], true);
}
