// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::{with_suffix, write_text};
use crate::analysis::group_by_category;
use crate::error::Result;
use crate::layout::LayoutCell;

/// `{base}.csv` with `category,bbox,text` rows
pub fn save_csv(cells: &[LayoutCell], base: &Path) -> Result<PathBuf> {
    let path = with_suffix(base, ".csv");
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(&path)?;
    writer.write_record(["category", "bbox", "text"])?;
    for cell in cells {
        let coords: Vec<String> = cell.bbox.iter().map(|v| v.to_string()).collect();
        let bbox = format!("[{}]", coords.join(", "));
        writer.write_record([cell.category.as_str(), bbox.as_str(), cell.text_or_empty()])?;
    }
    writer.flush()?;
    Ok(path)
}

/// Cells grouped by category as numbered plain-text lists
pub fn structured_text(cells: &[LayoutCell]) -> String {
    let mut out = String::new();
    for (category, items) in group_by_category(cells) {
        let _ = writeln!(out, "\n=== {} ===", category);
        for (i, item) in items.iter().enumerate() {
            let text = item.text_or_empty();
            if !text.trim().is_empty() {
                let _ = writeln!(out, "{}. {}", i + 1, text);
            }
        }
    }
    out
}

/// `{base}_structured.txt`
pub fn save_structured_text(cells: &[LayoutCell], base: &Path) -> Result<PathBuf> {
    let path = with_suffix(base, "_structured.txt");
    write_text(&path, &structured_text(cells))?;
    Ok(path)
}
