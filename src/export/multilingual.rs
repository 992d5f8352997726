// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde_json::json;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::{with_suffix, write_text};
use crate::analysis::MultilingualAnalysis;
use crate::error::Result;
use crate::layout::LayoutCell;

#[derive(Debug, Clone, PartialEq)]
pub struct MultilingualPaths {
    pub analysis_json: PathBuf,
    pub report: PathBuf,
    pub language_files: Vec<PathBuf>,
}

pub fn language_report(analysis: &MultilingualAnalysis) -> String {
    let mut out = String::from("Multilingual document report\n");
    out.push_str(&"=".repeat(40));
    out.push_str("\n\n");
    let _ = writeln!(out, "Layout elements: {}", analysis.total_elements);
    let _ = writeln!(out, "Mixed-language elements: {}", analysis.mixed_language_elements.len());
    let dominant: Vec<&str> = analysis.dominant_languages.iter().map(|s| s.as_str()).collect();
    let _ = writeln!(out, "Dominant languages: {}\n", dominant.join(", "));

    out.push_str("Language statistics:\n");
    out.push_str(&"-".repeat(20));
    out.push('\n');
    for (script, stat) in analysis.ranked_statistics() {
        if script.is_linguistic() {
            let _ = writeln!(
                out,
                "{:20}: {:5.1}% ({} elements)",
                script.as_str(),
                stat.ratio * 100.0,
                stat.element_count
            );
        }
    }

    if !analysis.mixed_language_elements.is_empty() {
        out.push_str("\nMixed-language elements:\n");
        out.push_str(&"-".repeat(20));
        out.push('\n');
        for element in &analysis.mixed_language_elements {
            let _ = writeln!(out, "Element {} ({}):", element.element_id, element.category);
            for (script, ratio) in &element.detected_languages {
                if script.is_linguistic() && *ratio > 0.1 {
                    let _ = writeln!(out, "  {}: {:.1}%", script, ratio * 100.0);
                }
            }
            out.push('\n');
        }
    }
    out
}

/// Write `{base}_analysis.json`, `{base}_language_report.txt` and one
/// `{base}_{script}.txt` per linguistic script found. `cells` must be the
/// slice the analysis was built from.
pub fn save_multilingual_results(
    analysis: &MultilingualAnalysis,
    cells: &[LayoutCell],
    source: &Path,
    base: &Path,
) -> Result<MultilingualPaths> {
    let analysis_json = with_suffix(base, "_analysis.json");
    let payload = json!({
        "file_path": source,
        "multilingual_analysis": analysis,
    });
    write_text(&analysis_json, &serde_json::to_string_pretty(&payload)?)?;

    let report = with_suffix(base, "_language_report.txt");
    write_text(&report, &language_report(analysis))?;

    let mut language_files = Vec::new();
    for (script, elements) in &analysis.elements_by_language {
        if !script.is_linguistic() || elements.is_empty() {
            continue;
        }
        let mut out = format!("{} content\n", script.as_str().to_uppercase());
        out.push_str(&"=".repeat(30));
        out.push_str("\n\n");
        for (i, element) in elements.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. [{}] (element {})",
                i + 1,
                element.category,
                element.element_id
            );
            if let Some(cell) = cells.get(element.element_id) {
                let _ = writeln!(out, "{}\n", cell.text_or_empty());
            }
        }
        let path = with_suffix(base, &format!("_{}.txt", script));
        write_text(&path, &out)?;
        language_files.push(path);
    }

    Ok(MultilingualPaths {
        analysis_json,
        report,
        language_files,
    })
}
