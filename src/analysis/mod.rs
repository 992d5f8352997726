// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod language;
pub mod multilingual;
pub mod structure;

pub use language::{
    classify_language, detect_content_languages, detect_languages, ContentLanguages,
    LanguageClass, Script,
};
pub use multilingual::{
    analyze_multilingual, extract_by_language, is_mixed_language, ElementLanguages,
    LanguageStatistic, MultilingualAnalysis,
};
pub use structure::{
    analyze_structured_content, category_counts, extract_category, formulas_to_latex,
    group_by_category, tables_to_html, StructuredAnalysis, TextItem,
};
