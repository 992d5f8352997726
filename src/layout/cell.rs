// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Layout cell types returned by the layout prompts

use serde::{Deserialize, Serialize};
use std::fmt;

/// `[x1, y1, x2, y2]` in pixels of the original image
pub type BBox = [f64; 4];

/// Layout category emitted by the model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Caption,
    Footnote,
    Formula,
    ListItem,
    PageFooter,
    PageHeader,
    Picture,
    SectionHeader,
    Table,
    Text,
    Title,
    /// Anything outside the known set, kept verbatim
    Unknown(String),
}

impl Category {
    pub const KNOWN: [Category; 11] = [
        Category::Caption,
        Category::Footnote,
        Category::Formula,
        Category::ListItem,
        Category::PageFooter,
        Category::PageHeader,
        Category::Picture,
        Category::SectionHeader,
        Category::Table,
        Category::Text,
        Category::Title,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Caption => "Caption",
            Self::Footnote => "Footnote",
            Self::Formula => "Formula",
            Self::ListItem => "List-item",
            Self::PageFooter => "Page-footer",
            Self::PageHeader => "Page-header",
            Self::Picture => "Picture",
            Self::SectionHeader => "Section-header",
            Self::Table => "Table",
            Self::Text => "Text",
            Self::Title => "Title",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_page_furniture(&self) -> bool {
        matches!(self, Self::PageHeader | Self::PageFooter)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        match name {
            "Caption" => Self::Caption,
            "Footnote" => Self::Footnote,
            "Formula" => Self::Formula,
            "List-item" => Self::ListItem,
            "Page-footer" => Self::PageFooter,
            "Page-header" => Self::PageHeader,
            "Picture" => Self::Picture,
            "Section-header" => Self::SectionHeader,
            "Table" => Self::Table,
            "Text" => Self::Text,
            "Title" => Self::Title,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from(name.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected layout element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutCell {
    pub bbox: BBox,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 1-based position after [`sort_reading_order`](super::sort_reading_order)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<u32>,
    /// 1-based page, set when pages of a PDF are merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

impl LayoutCell {
    pub fn new(bbox: BBox, category: Category, text: Option<String>) -> Self {
        Self {
            bbox,
            category,
            text,
            reading_order: None,
            page_number: None,
        }
    }

    /// Cell text, empty when the category carries none
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn width(&self) -> f64 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> f64 {
        self.bbox[3] - self.bbox[1]
    }
}
