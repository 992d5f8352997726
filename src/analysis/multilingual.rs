// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-element script detection across a document

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::language::{detect_languages, Script};
use crate::layout::{BBox, Category, LayoutCell};

/// Number of dominant languages reported
pub const DOMINANT_LANGUAGES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementLanguages {
    /// Index of the cell in the analysed slice
    pub element_id: usize,
    pub category: Category,
    /// Length in characters
    pub text_length: usize,
    pub detected_languages: BTreeMap<Script, f64>,
    pub bbox: BBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStatistic {
    /// Share of the summed per-element ratios
    pub ratio: f64,
    pub element_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultilingualAnalysis {
    pub total_elements: usize,
    pub elements_by_language: BTreeMap<Script, Vec<ElementLanguages>>,
    pub language_statistics: BTreeMap<Script, LanguageStatistic>,
    pub mixed_language_elements: Vec<ElementLanguages>,
    pub dominant_languages: Vec<Script>,
}

impl MultilingualAnalysis {
    /// Language statistics sorted by descending ratio
    pub fn ranked_statistics(&self) -> Vec<(Script, &LanguageStatistic)> {
        let mut ranked: Vec<_> = self
            .language_statistics
            .iter()
            .map(|(script, stat)| (*script, stat))
            .collect();
        ranked.sort_by(|a, b| b.1.ratio.partial_cmp(&a.1.ratio).unwrap_or(Ordering::Equal));
        ranked
    }
}

/// An element is mixed when more than two scripts are present and more
/// than one of them is linguistic
pub fn is_mixed_language(languages: &BTreeMap<Script, f64>) -> bool {
    languages.len() > 2 && languages.keys().filter(|s| s.is_linguistic()).count() > 1
}

pub fn analyze_multilingual(cells: &[LayoutCell]) -> MultilingualAnalysis {
    let mut analysis = MultilingualAnalysis {
        total_elements: cells.len(),
        ..Default::default()
    };
    let mut scores: BTreeMap<Script, f64> = BTreeMap::new();

    for (element_id, cell) in cells.iter().enumerate() {
        let text = cell.text_or_empty();
        if text.trim().is_empty() {
            continue;
        }
        let languages = detect_languages(text);
        let element = ElementLanguages {
            element_id,
            category: cell.category.clone(),
            text_length: text.chars().count(),
            detected_languages: languages.clone(),
            bbox: cell.bbox,
        };

        for (script, ratio) in &languages {
            *scores.entry(*script).or_insert(0.0) += ratio;
            analysis
                .elements_by_language
                .entry(*script)
                .or_default()
                .push(element.clone());
        }

        if is_mixed_language(&languages) {
            analysis.mixed_language_elements.push(element);
        }
    }

    let total: f64 = scores.values().sum();
    if total > 0.0 {
        for (script, score) in &scores {
            let element_count = analysis
                .elements_by_language
                .get(script)
                .map_or(0, Vec::len);
            analysis.language_statistics.insert(
                *script,
                LanguageStatistic {
                    ratio: score / total,
                    element_count,
                },
            );
        }
    }

    analysis.dominant_languages = analysis
        .ranked_statistics()
        .into_iter()
        .map(|(script, _)| script)
        .filter(Script::is_linguistic)
        .take(DOMINANT_LANGUAGES)
        .collect();

    analysis
}

/// Elements containing `script`
pub fn extract_by_language(analysis: &MultilingualAnalysis, script: Script) -> &[ElementLanguages] {
    analysis
        .elements_by_language
        .get(&script)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
