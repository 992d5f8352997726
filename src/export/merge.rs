// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Merging per-page PDF results into document-level files

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{with_suffix, write_text};
use crate::analysis::category_counts;
use crate::error::Result;
use crate::layout::LayoutCell;
use crate::parser::PageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based
    pub page_number: usize,
    pub input_width: u32,
    pub input_height: u32,
    pub has_layout: bool,
    pub has_text: bool,
    pub filtered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedInfo {
    pub total_pages: usize,
    pub total_layout_elements: usize,
    /// Characters of merged text, page headers included
    pub total_text_length: usize,
    pub pages_info: Vec<PageInfo>,
    pub category_statistics: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedDocument {
    /// Cells of every page tagged with their 1-based `page_number`
    pub cells: Vec<LayoutCell>,
    pub text: String,
    pub info: MergedInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedPaths {
    pub layout: PathBuf,
    pub text: PathBuf,
    pub info: PathBuf,
}

/// Combine page results in page order.
///
/// Pages whose files cannot be read are logged and skipped.
pub fn merge_page_results(results: &[PageResult]) -> MergedDocument {
    let mut pages: Vec<&PageResult> = results.iter().collect();
    pages.sort_by_key(|r| r.page_no);

    let mut cells = Vec::new();
    let mut sections = Vec::new();
    let mut pages_info = Vec::with_capacity(pages.len());

    for page in pages {
        let page_number = page.page_no + 1;

        match page.load_cells() {
            Ok(page_cells) => cells.extend(page_cells.into_iter().map(|mut c| {
                c.page_number = Some(page_number as u32);
                c
            })),
            Err(e) => warn!("Skipping layout of page {}: {}", page_number, e),
        }

        match page.load_markdown() {
            Ok(Some(text)) => sections.push(format!("--- Page {} ---\n\n{}", page_number, text)),
            Ok(None) => {}
            Err(e) => warn!("Skipping text of page {}: {}", page_number, e),
        }

        pages_info.push(PageInfo {
            page_number,
            input_width: page.input_width,
            input_height: page.input_height,
            has_layout: page.has_layout(),
            has_text: page.has_text(),
            filtered: page.filtered,
        });
    }

    let total_text_length = sections.iter().map(|s| s.chars().count()).sum();
    let info = MergedInfo {
        total_pages: results.len(),
        total_layout_elements: cells.len(),
        total_text_length,
        pages_info,
        category_statistics: category_counts(&cells),
    };

    MergedDocument {
        cells,
        text: sections.join("\n\n"),
        info,
    }
}

impl MergedDocument {
    /// Write `{base}_merged_layout.json`, `{base}_merged_text.md` and
    /// `{base}_merged_info.json`
    pub fn save(&self, base: &Path) -> Result<MergedPaths> {
        let paths = MergedPaths {
            layout: with_suffix(base, "_merged_layout.json"),
            text: with_suffix(base, "_merged_text.md"),
            info: with_suffix(base, "_merged_info.json"),
        };
        write_text(&paths.layout, &serde_json::to_string_pretty(&self.cells)?)?;
        write_text(&paths.text, &self.text)?;
        write_text(&paths.info, &serde_json::to_string_pretty(&self.info)?)?;

        info!(
            "Merged {} pages ({} elements) into {}",
            self.info.total_pages,
            self.info.total_layout_elements,
            paths.layout.display()
        );
        Ok(paths)
    }
}
