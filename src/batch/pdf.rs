// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PDF-focused processing with running statistics

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

use super::processor::FileStatus;
use crate::analysis::{analyze_structured_content, StructuredAnalysis};
use crate::error::{OcrError, Result};
use crate::export::{merge_page_results, save_structured_results, MergedInfo, MergedPaths};
use crate::parser::{file_stem, DotsOcrParser, PageResult, ParseOptions};
use crate::pdf::{clip_range, PdfInfo};
use crate::prompts::PromptMode;
use crate::vision::{OcrBackend, VlmClient};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub total_pages: usize,
    pub successful_pages: usize,
    pub failed_pages: usize,
    /// Seconds
    pub total_time: f64,
}

impl ProcessingStats {
    /// Percentage of pages that parsed cleanly
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.successful_pages as f64 / self.total_pages as f64 * 100.0
        }
    }

    pub fn pages_per_second(&self) -> f64 {
        if self.total_time > 0.0 {
            self.successful_pages as f64 / self.total_time
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfBatchResult {
    pub file_path: PathBuf,
    pub status: FileStatus,
    pub page_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_info: Option<MergedInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of parse + merge + structured analysis for one PDF
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub pages: Vec<PageResult>,
    pub merged_paths: MergedPaths,
    pub merged_info: MergedInfo,
    pub analysis: StructuredAnalysis,
    pub structured_dir: PathBuf,
    pub session_id: String,
}

pub struct PdfProcessor<B: OcrBackend = VlmClient> {
    parser: DotsOcrParser<B>,
    stats: ProcessingStats,
}

impl<B: OcrBackend> PdfProcessor<B> {
    pub fn new(parser: DotsOcrParser<B>) -> Self {
        Self {
            parser,
            stats: ProcessingStats::default(),
        }
    }

    pub fn parser(&self) -> &DotsOcrParser<B> {
        &self.parser
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub async fn pdf_info(&self, path: &Path) -> Result<PdfInfo> {
        PdfInfo::inspect(self.parser.renderer(), path, self.parser.config().dpi).await
    }

    /// Parse a whole PDF and update the statistics
    pub async fn parse_pdf(&mut self, path: &Path, mode: PromptMode) -> Result<Vec<PageResult>> {
        self.parse_with(path, ParseOptions::new(mode)).await
    }

    /// Parse pages `start..end` (0-based, end-exclusive)
    pub async fn parse_pages_range(
        &mut self,
        path: &Path,
        start: usize,
        end: usize,
        mode: PromptMode,
    ) -> Result<Vec<PageResult>> {
        if end <= start {
            return Err(OcrError::Config(format!(
                "empty page range {}..{}",
                start, end
            )));
        }
        self.parse_with(path, ParseOptions::new(mode).with_page_range(start..end))
            .await
    }

    async fn parse_with(&mut self, path: &Path, options: ParseOptions) -> Result<Vec<PageResult>> {
        let started = Instant::now();
        self.stats.total_files += 1;
        let outcome = self.parser.parse_file_with(path, &options).await;
        self.stats.total_time += started.elapsed().as_secs_f64();

        match outcome {
            Ok(pages) => {
                let filtered = pages.iter().filter(|p| p.filtered).count();
                self.stats.total_pages += pages.len();
                self.stats.successful_pages += pages.len() - filtered;
                self.stats.failed_pages += filtered;
                Ok(pages)
            }
            Err(e) => {
                // count the pages that were attempted, when the document can be read
                let total = self.parser.renderer().page_count(path).await.unwrap_or(0);
                let attempted = clip_range(options.page_range.clone(), total).len();
                self.stats.total_pages += attempted;
                self.stats.failed_pages += attempted;
                Err(e)
            }
        }
    }

    /// Parse each PDF, merging the pages of the successful ones
    pub async fn batch_process(&mut self, paths: &[PathBuf], mode: PromptMode) -> Vec<PdfBatchResult> {
        let mut batch = Vec::with_capacity(paths.len());
        for (i, path) in paths.iter().enumerate() {
            info!("PDF {}/{}: {}", i + 1, paths.len(), path.display());
            let result = match self.parse_pdf(path, mode).await {
                Ok(pages) => {
                    let merged = merge_page_results(&pages);
                    match merged.save(&self.merge_base(path)) {
                        Ok(_) => PdfBatchResult {
                            file_path: path.clone(),
                            status: FileStatus::Success,
                            page_count: pages.len(),
                            merged_info: Some(merged.info),
                            error: None,
                        },
                        Err(e) => {
                            error!("Failed to save merged results for {}: {}", path.display(), e);
                            PdfBatchResult {
                                file_path: path.clone(),
                                status: FileStatus::Error,
                                page_count: pages.len(),
                                merged_info: None,
                                error: Some(format!("merge failed: {}", e)),
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to parse {}: {}", path.display(), e);
                    PdfBatchResult {
                        file_path: path.clone(),
                        status: FileStatus::Error,
                        page_count: 0,
                        merged_info: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            batch.push(result);
        }
        batch
    }

    /// Parse, merge pages and write the structured analysis.
    ///
    /// Merged files go to `{output_dir}/{stem}/{stem}_merged_*`, the
    /// analysis to `{output_dir}/{stem}/structured_{session}/`.
    pub async fn process_document(&mut self, path: &Path, mode: PromptMode) -> Result<DocumentReport> {
        let pages = self.parse_pdf(path, mode).await?;
        let merged = merge_page_results(&pages);
        let merged_paths = merged.save(&self.merge_base(path))?;

        let analysis = analyze_structured_content(&merged.cells);
        let session_id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
        let save_dir = self.parser.output_dir().join(file_stem(path));
        let structured_dir = save_structured_results(&analysis, &session_id, &save_dir)?;

        Ok(DocumentReport {
            pages,
            merged_paths,
            merged_info: merged.info,
            analysis,
            structured_dir,
            session_id,
        })
    }

    fn merge_base(&self, path: &Path) -> PathBuf {
        let stem = file_stem(path);
        self.parser.output_dir().join(&stem).join(&stem)
    }
}
