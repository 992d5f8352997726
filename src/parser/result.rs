// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::layout::LayoutCell;

/// Files written for one parsed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Input document
    pub file_path: PathBuf,
    /// 0-based page index; 0 for images
    pub page_no: usize,
    /// Size of the image the model saw
    pub input_width: u32,
    pub input_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_info_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_image_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md_content_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md_content_nohf_path: Option<PathBuf>,
    /// Model output could not be parsed as layout
    #[serde(default)]
    pub filtered: bool,
}

impl PageResult {
    /// Layout cells from `layout_info_path`; empty when there is no layout
    /// or the page was filtered
    pub fn load_cells(&self) -> Result<Vec<LayoutCell>> {
        match (&self.layout_info_path, self.filtered) {
            (Some(path), false) => {
                let content = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            _ => Ok(Vec::new()),
        }
    }

    pub fn load_markdown(&self) -> Result<Option<String>> {
        match &self.md_content_path {
            Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }

    pub fn load_markdown_nohf(&self) -> Result<Option<String>> {
        match &self.md_content_nohf_path {
            Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }

    pub fn has_layout(&self) -> bool {
        self.layout_info_path.is_some()
    }

    pub fn has_text(&self) -> bool {
        self.md_content_path.is_some()
    }
}
