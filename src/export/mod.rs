// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Derived output files
//!
//! Every writer takes a `base` path prefix and appends a fixed suffix, so
//! `out/report` yields `out/report_tables.html`, `out/report.csv` and so on.
//! Parent directories are created as needed.

pub mod formats;
pub mod merge;
pub mod multilingual;
pub mod structured;

pub use formats::{save_csv, save_structured_text, structured_text};
pub use merge::{merge_page_results, MergedDocument, MergedInfo, MergedPaths, PageInfo};
pub use multilingual::{language_report, save_multilingual_results, MultilingualPaths};
pub use structured::{analysis_report, save_category_files, save_structured_results};

use std::path::{Path, PathBuf};

use crate::error::Result;

/// `base` with `suffix` appended to its file name
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    base.with_file_name(name)
}

pub(crate) fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}
