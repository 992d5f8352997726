// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::ops::Range;

use crate::error::{OcrError, Result};
use crate::layout::BBox;
use crate::prompts::PromptMode;

/// Per-call parse settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOptions {
    pub prompt_mode: PromptMode,
    /// Region in original-image pixels, required for grounding
    pub bbox: Option<BBox>,
    /// 0-based, end-exclusive PDF page range
    pub page_range: Option<Range<usize>>,
    /// Resample raster inputs as if rendered from a PDF at the configured DPI
    pub fitz_preprocess: bool,
}

impl ParseOptions {
    pub fn new(prompt_mode: PromptMode) -> Self {
        Self {
            prompt_mode,
            ..Default::default()
        }
    }

    /// Grounding OCR of one region
    pub fn grounding(bbox: BBox) -> Self {
        Self {
            prompt_mode: PromptMode::GroundingOcr,
            bbox: Some(bbox),
            ..Default::default()
        }
    }

    pub fn with_page_range(mut self, range: Range<usize>) -> Self {
        self.page_range = Some(range);
        self
    }

    pub fn with_fitz_preprocess(mut self, enabled: bool) -> Self {
        self.fitz_preprocess = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        match (self.prompt_mode, self.bbox) {
            (PromptMode::GroundingOcr, None) => Err(OcrError::InvalidBbox(Vec::new())),
            (_, Some(bbox)) => validate_bbox(bbox),
            _ => Ok(()),
        }
    }
}

/// A bbox must be finite, non-negative and have positive area
pub fn validate_bbox(bbox: BBox) -> Result<()> {
    let ok = bbox.iter().all(|v| v.is_finite() && *v >= 0.0)
        && bbox[2] > bbox[0]
        && bbox[3] > bbox[1];
    if ok {
        Ok(())
    } else {
        Err(OcrError::InvalidBbox(bbox.to_vec()))
    }
}
