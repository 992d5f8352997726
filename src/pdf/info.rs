// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::render::{points_to_pixels, PdfRenderer};
use crate::error::Result;

/// Rough per-page cost used for time estimates
pub const ESTIMATED_SECS_PER_PAGE: u64 = 10;

/// Summary of a PDF before parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfInfo {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub page_count: usize,
    pub dpi: u32,
    /// First page size in pixels at `dpi`
    pub page_width: Option<u32>,
    pub page_height: Option<u32>,
    pub page_pixels: Option<u64>,
    pub estimated_processing_secs: u64,
}

impl PdfInfo {
    pub async fn inspect(renderer: &PdfRenderer, path: &Path, dpi: u32) -> Result<Self> {
        let file_size = tokio::fs::metadata(path).await?.len();
        let meta = renderer.metadata(path).await?;
        let dims = meta.page_size_pts.map(|pts| points_to_pixels(pts, dpi));

        Ok(Self {
            file_path: path.to_path_buf(),
            file_size,
            page_count: meta.page_count,
            dpi,
            page_width: dims.map(|d| d.0),
            page_height: dims.map(|d| d.1),
            page_pixels: dims.map(|(w, h)| w as u64 * h as u64),
            estimated_processing_secs: meta.page_count as u64 * ESTIMATED_SECS_PER_PAGE,
        })
    }

    pub fn file_size_mb(&self) -> f64 {
        self.file_size as f64 / (1024.0 * 1024.0)
    }
}
