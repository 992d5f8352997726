// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Element-type and language breakdown of parsed layout cells

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::language::{classify_language, detect_content_languages, LanguageClass};
use crate::layout::{strip_math_delimiters, BBox, Category, LayoutCell};

/// Category order used when listing grouped content
pub const GROUP_ORDER: [Category; 11] = [
    Category::Title,
    Category::Text,
    Category::Table,
    Category::Formula,
    Category::ListItem,
    Category::Caption,
    Category::SectionHeader,
    Category::Picture,
    Category::Footnote,
    Category::PageHeader,
    Category::PageFooter,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub bbox: BBox,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

impl TextItem {
    fn from_cell(cell: &LayoutCell) -> Self {
        Self {
            text: cell.text_or_empty().to_string(),
            bbox: cell.bbox,
            category: cell.category.clone(),
            chinese_ratio: None,
            english_ratio: None,
            page_number: cell.page_number,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub chinese_elements: usize,
    pub english_elements: usize,
    pub mixed_elements: usize,
    pub total_text_elements: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementTypes {
    pub tables: usize,
    pub images: usize,
    pub formulas: usize,
    pub text_blocks: usize,
    pub titles: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBuckets {
    pub chinese_text: Vec<TextItem>,
    pub english_text: Vec<TextItem>,
    pub mixed_text: Vec<TextItem>,
    pub tables: Vec<TextItem>,
    pub formulas: Vec<TextItem>,
    pub titles: Vec<TextItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    pub total_elements: usize,
    pub content_types: BTreeMap<String, usize>,
    pub language_stats: LanguageStats,
    pub element_types: ElementTypes,
    pub text_by_type: TextBuckets,
}

/// Count element types and bucket body text by language.
///
/// Only Text, List-item and Caption cells are language-classified.
pub fn analyze_structured_content(cells: &[LayoutCell]) -> StructuredAnalysis {
    let mut analysis = StructuredAnalysis {
        total_elements: cells.len(),
        content_types: category_counts(cells),
        ..Default::default()
    };

    for cell in cells {
        match cell.category {
            Category::Table => {
                analysis.element_types.tables += 1;
                analysis.text_by_type.tables.push(TextItem::from_cell(cell));
            }
            Category::Picture => analysis.element_types.images += 1,
            Category::Formula => {
                analysis.element_types.formulas += 1;
                analysis.text_by_type.formulas.push(TextItem::from_cell(cell));
            }
            Category::Title | Category::SectionHeader => {
                analysis.element_types.titles += 1;
                analysis.text_by_type.titles.push(TextItem::from_cell(cell));
            }
            Category::Text | Category::ListItem | Category::Caption => {
                analysis.element_types.text_blocks += 1;
                let text = cell.text_or_empty();
                if text.trim().is_empty() {
                    continue;
                }
                analysis.language_stats.total_text_elements += 1;

                let langs = detect_content_languages(text);
                let item = TextItem {
                    chinese_ratio: Some(langs.chinese),
                    english_ratio: Some(langs.english),
                    ..TextItem::from_cell(cell)
                };
                match classify_language(langs.chinese, langs.english) {
                    LanguageClass::Chinese => {
                        analysis.language_stats.chinese_elements += 1;
                        analysis.text_by_type.chinese_text.push(item);
                    }
                    LanguageClass::English => {
                        analysis.language_stats.english_elements += 1;
                        analysis.text_by_type.english_text.push(item);
                    }
                    LanguageClass::Mixed => {
                        analysis.language_stats.mixed_elements += 1;
                        analysis.text_by_type.mixed_text.push(item);
                    }
                }
            }
            _ => {}
        }
    }

    analysis
}

/// Number of cells per category name
pub fn category_counts(cells: &[LayoutCell]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for cell in cells {
        *counts.entry(cell.category.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn extract_category(cells: &[LayoutCell], category: &Category) -> Vec<LayoutCell> {
    cells
        .iter()
        .filter(|c| &c.category == category)
        .cloned()
        .collect()
}

/// Known categories in [`GROUP_ORDER`], empty groups omitted
pub fn group_by_category(cells: &[LayoutCell]) -> Vec<(Category, Vec<LayoutCell>)> {
    GROUP_ORDER
        .iter()
        .map(|category| (category.clone(), extract_category(cells, category)))
        .filter(|(_, items)| !items.is_empty())
        .collect()
}

/// HTML for each table cell; non-HTML text is wrapped in a captioned table
pub fn tables_to_html(tables: &[LayoutCell]) -> Vec<String> {
    tables
        .iter()
        .enumerate()
        .map(|(i, table)| {
            let text = table.text_or_empty();
            if text.trim_start().starts_with("<table") {
                text.to_string()
            } else {
                format!(
                    "<table>\n<caption>Table {}</caption>\n<tbody>\n{}\n</tbody>\n</table>",
                    i + 1,
                    text
                )
            }
        })
        .collect()
}

/// Bare LaTeX for each non-empty formula
pub fn formulas_to_latex(formulas: &[LayoutCell]) -> Vec<String> {
    formulas
        .iter()
        .map(LayoutCell::text_or_empty)
        .filter(|t| !t.trim().is_empty())
        .map(|t| strip_math_delimiters(t).to_string())
        .collect()
}
