// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sequential processing of many input files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::export::write_text;
use crate::parser::{DotsOcrParser, PageResult, ParseOptions};
use crate::prompts::PromptMode;
use crate::vision::{is_image_path, OcrBackend, VlmClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Error,
}

/// Outcome of one file; failures are recorded, never raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub file_path: PathBuf,
    pub status: FileStatus,
    /// Seconds
    pub processing_time: f64,
    pub page_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results: Vec<PageResult>,
}

impl FileResult {
    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Success
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub total_pages: usize,
    pub total_processing_time: f64,
    pub results: Vec<FileResult>,
}

impl BatchSummary {
    pub fn from_results(results: &[FileResult]) -> Self {
        let successful_files = results.iter().filter(|r| r.is_success()).count();
        Self {
            generated_at: Utc::now(),
            total_files: results.len(),
            successful_files,
            failed_files: results.len() - successful_files,
            total_pages: results
                .iter()
                .filter(|r| r.is_success())
                .map(|r| r.page_count)
                .sum(),
            total_processing_time: results.iter().map(|r| r.processing_time).sum(),
            results: results.to_vec(),
        }
    }
}

/// Whether `path` has an image or PDF extension (case-insensitive)
pub fn is_supported_input(path: &Path) -> bool {
    is_image_path(path)
        || path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case("pdf"))
}

/// Supported files under `dir`, sorted
pub fn scan_directory(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_inputs(dir, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_inputs(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_inputs(&path, recursive, files)?;
            }
        } else if is_supported_input(&path) {
            files.push(path);
        }
    }
    Ok(())
}

pub struct BatchProcessor<B: OcrBackend = VlmClient> {
    parser: DotsOcrParser<B>,
    results: Vec<FileResult>,
}

impl<B: OcrBackend> BatchProcessor<B> {
    pub fn new(parser: DotsOcrParser<B>) -> Self {
        Self {
            parser,
            results: Vec::new(),
        }
    }

    pub fn parser(&self) -> &DotsOcrParser<B> {
        &self.parser
    }

    /// Every file processed so far
    pub fn results(&self) -> &[FileResult] {
        &self.results
    }

    pub async fn process_single_file(&self, path: &Path, mode: PromptMode) -> FileResult {
        let started = Instant::now();
        match self.parser.parse_file_with(path, &ParseOptions::new(mode)).await {
            Ok(results) => FileResult {
                file_path: path.to_path_buf(),
                status: FileStatus::Success,
                processing_time: started.elapsed().as_secs_f64(),
                page_count: results.len(),
                error: None,
                results,
            },
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                FileResult {
                    file_path: path.to_path_buf(),
                    status: FileStatus::Error,
                    processing_time: started.elapsed().as_secs_f64(),
                    page_count: 0,
                    error: Some(e.to_string()),
                    results: Vec::new(),
                }
            }
        }
    }

    /// Process files one after another and record their results
    pub async fn process_file_list(&mut self, paths: &[PathBuf], mode: PromptMode) -> Vec<FileResult> {
        let started = Instant::now();
        let mut batch = Vec::with_capacity(paths.len());

        for (i, path) in paths.iter().enumerate() {
            info!("[{}/{}] Processing {}", i + 1, paths.len(), path.display());
            let result = self.process_single_file(path, mode).await;
            if result.is_success() {
                info!(
                    "[{}/{}] Done: {} page(s) in {:.2}s",
                    i + 1,
                    paths.len(),
                    result.page_count,
                    result.processing_time
                );
            } else {
                warn!("[{}/{}] Failed: {}", i + 1, paths.len(), path.display());
            }
            batch.push(result);
        }

        let summary = BatchSummary::from_results(&batch);
        info!(
            "Batch finished in {:.2}s: {} succeeded, {} failed, {} page(s)",
            started.elapsed().as_secs_f64(),
            summary.successful_files,
            summary.failed_files,
            summary.total_pages
        );

        self.results.extend(batch.iter().cloned());
        batch
    }

    pub async fn process_directory(
        &mut self,
        dir: &Path,
        mode: PromptMode,
        recursive: bool,
    ) -> Result<Vec<FileResult>> {
        let files = scan_directory(dir, recursive)?;
        if files.is_empty() {
            warn!("No supported files found in {}", dir.display());
            return Ok(Vec::new());
        }
        let pdfs = files
            .iter()
            .filter(|p| p.extension().map_or(false, |e| e.eq_ignore_ascii_case("pdf")))
            .count();
        info!(
            "Found {} file(s) in {}: {} image(s), {} PDF(s)",
            files.len(),
            dir.display(),
            files.len() - pdfs,
            pdfs
        );
        Ok(self.process_file_list(&files, mode).await)
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(&self.results)
    }

    pub fn save_summary(&self, path: &Path) -> Result<BatchSummary> {
        let summary = self.summary();
        write_text(path, &serde_json::to_string_pretty(&summary)?)?;
        info!("Batch summary saved to {}", path.display());
        Ok(summary)
    }
}
