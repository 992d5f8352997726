// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{with_suffix, write_text};
use crate::analysis::{StructuredAnalysis, TextItem};
use crate::error::Result;
use crate::layout::formula_to_markdown;

fn bbox_label(item: &TextItem) -> String {
    let coords: Vec<String> = item.bbox.iter().map(|v| format!("{}", v)).collect();
    format!("[{}]", coords.join(", "))
}

fn items_markdown(title: &str, items: &[TextItem], with_ratios: bool) -> String {
    let mut out = format!("# {}\n\n", title);
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "## Content {} - {}\n", i + 1, item.category);
        if with_ratios {
            let _ = writeln!(
                out,
                "**Language mix**: Chinese {:.1}%, English {:.1}%\n",
                item.chinese_ratio.unwrap_or(0.0) * 100.0,
                item.english_ratio.unwrap_or(0.0) * 100.0
            );
        }
        let _ = writeln!(out, "**Position**: {}\n", bbox_label(item));
        let _ = writeln!(out, "{}\n", item.text);
    }
    out
}

fn tables_page(items: &[TextItem]) -> String {
    let mut out = String::from(
        "<html><head><meta charset='utf-8'><title>Tables</title></head><body>\n<h1>Tables</h1>\n",
    );
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "<h2>Table {}</h2>", i + 1);
        let _ = writeln!(out, "<p><strong>Position</strong>: {}</p>", bbox_label(item));
        out.push_str("<div style='border: 1px solid #ccc; padding: 10px; margin: 10px 0;'>\n");
        let _ = writeln!(out, "{}", item.text.replace('\n', "<br>"));
        out.push_str("</div>\n");
    }
    out.push_str("</body></html>");
    out
}

fn formulas_page(items: &[TextItem]) -> String {
    let mut out = String::from("# Formulas\n\n");
    for (i, item) in items.iter().enumerate() {
        if item.text.trim().is_empty() {
            continue;
        }
        let _ = writeln!(out, "## Formula {}\n", i + 1);
        let _ = writeln!(out, "{}\n", formula_to_markdown(&item.text));
    }
    out
}

/// Plain-text summary of a structured analysis
pub fn analysis_report(analysis: &StructuredAnalysis) -> String {
    let mut out = String::from("Content analysis report\n");
    out.push_str(&"=".repeat(30));
    out.push_str("\n\n## Totals\n");
    let _ = writeln!(out, "Elements: {}", analysis.total_elements);
    let _ = writeln!(out, "Text elements: {}", analysis.language_stats.total_text_elements);
    let _ = writeln!(out, "Tables: {}", analysis.element_types.tables);
    let _ = writeln!(out, "Images: {}", analysis.element_types.images);
    let _ = writeln!(out, "Formulas: {}", analysis.element_types.formulas);
    let _ = writeln!(out, "Titles: {}\n", analysis.element_types.titles);

    out.push_str("## Languages\n");
    let _ = writeln!(out, "Chinese elements: {}", analysis.language_stats.chinese_elements);
    let _ = writeln!(out, "English elements: {}", analysis.language_stats.english_elements);
    let _ = writeln!(out, "Mixed elements: {}\n", analysis.language_stats.mixed_elements);

    out.push_str("## Element types\n");
    for (category, count) in &analysis.content_types {
        let _ = writeln!(out, "{}: {}", category, count);
    }
    out
}

/// Write `structured_{session_id}/` under `output_dir`.
///
/// Language and table files are written only when they have content; the
/// report is always written. Returns the directory.
pub fn save_structured_results(
    analysis: &StructuredAnalysis,
    session_id: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let dir = output_dir.join(format!("structured_{}", session_id));
    std::fs::create_dir_all(&dir)?;
    let buckets = &analysis.text_by_type;

    if !buckets.chinese_text.is_empty() {
        write_text(
            &dir.join("chinese_content.md"),
            &items_markdown("Chinese Content", &buckets.chinese_text, false),
        )?;
    }
    if !buckets.english_text.is_empty() {
        write_text(
            &dir.join("english_content.md"),
            &items_markdown("English Content", &buckets.english_text, false),
        )?;
    }
    if !buckets.mixed_text.is_empty() {
        write_text(
            &dir.join("mixed_language_content.md"),
            &items_markdown("Mixed Language Content", &buckets.mixed_text, true),
        )?;
    }
    if !buckets.tables.is_empty() {
        write_text(&dir.join("tables.html"), &tables_page(&buckets.tables))?;
    }
    write_text(&dir.join("analysis_report.txt"), &analysis_report(analysis))?;

    info!("Structured results saved to {}", dir.display());
    Ok(dir)
}

/// Write `{base}_chinese.md`, `_english.md`, `_mixed.md`, `_tables.html`
/// and `_formulas.md` for the non-empty buckets
pub fn save_category_files(analysis: &StructuredAnalysis, base: &Path) -> Result<Vec<PathBuf>> {
    let buckets = &analysis.text_by_type;
    let mut written = Vec::new();

    let files: [(&str, &[TextItem], String); 5] = [
        (
            "_chinese.md",
            buckets.chinese_text.as_slice(),
            items_markdown("Chinese Content", &buckets.chinese_text, false),
        ),
        (
            "_english.md",
            buckets.english_text.as_slice(),
            items_markdown("English Content", &buckets.english_text, false),
        ),
        (
            "_mixed.md",
            buckets.mixed_text.as_slice(),
            items_markdown("Mixed Language Content", &buckets.mixed_text, true),
        ),
        ("_tables.html", buckets.tables.as_slice(), tables_page(&buckets.tables)),
        ("_formulas.md", buckets.formulas.as_slice(), formulas_page(&buckets.formulas)),
    ];

    for (suffix, items, content) in files {
        if items.is_empty() {
            continue;
        }
        let path = with_suffix(base, suffix);
        write_text(&path, &content)?;
        written.push(path);
    }
    Ok(written)
}
