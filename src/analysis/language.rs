// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Character-range language detection
//!
//! Ratios are matching characters over all characters of the text,
//! whitespace included. Scripts overlap (CJK ideographs count for both
//! Chinese variants and Japanese), so ratios need not sum to 1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    ChineseSimplified,
    ChineseTraditional,
    Japanese,
    Korean,
    Arabic,
    Hebrew,
    Thai,
    Vietnamese,
    Cyrillic,
    Devanagari,
    Latin,
    Digits,
    Punctuation,
}

const VIETNAMESE_CHARS: &str = "àáạảãâầấậẩẫăằắặẳẵèéẹẻẽêềếệểễìíịỉĩòóọỏõôồốộổỗơờớợởỡùúụủũưừứựửữỳýỵỷỹđ";

const PUNCTUATION_CHARS: &str = ".,;:!?()\"'-";

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fff}')
}

impl Script {
    pub const ALL: [Script; 13] = [
        Script::ChineseSimplified,
        Script::ChineseTraditional,
        Script::Japanese,
        Script::Korean,
        Script::Arabic,
        Script::Hebrew,
        Script::Thai,
        Script::Vietnamese,
        Script::Cyrillic,
        Script::Devanagari,
        Script::Latin,
        Script::Digits,
        Script::Punctuation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChineseSimplified => "chinese_simplified",
            Self::ChineseTraditional => "chinese_traditional",
            Self::Japanese => "japanese",
            Self::Korean => "korean",
            Self::Arabic => "arabic",
            Self::Hebrew => "hebrew",
            Self::Thai => "thai",
            Self::Vietnamese => "vietnamese",
            Self::Cyrillic => "cyrillic",
            Self::Devanagari => "devanagari",
            Self::Latin => "latin",
            Self::Digits => "digits",
            Self::Punctuation => "punctuation",
        }
    }

    /// Digits and punctuation say nothing about the language
    pub fn is_linguistic(&self) -> bool {
        !matches!(self, Self::Digits | Self::Punctuation)
    }

    pub fn matches(&self, c: char) -> bool {
        match self {
            Self::ChineseSimplified | Self::ChineseTraditional => is_cjk_ideograph(c),
            Self::Japanese => {
                matches!(c, '\u{3040}'..='\u{309f}' | '\u{30a0}'..='\u{30ff}') || is_cjk_ideograph(c)
            }
            Self::Korean => matches!(c, '\u{ac00}'..='\u{d7af}'),
            Self::Arabic => matches!(c, '\u{0600}'..='\u{06ff}'),
            Self::Hebrew => matches!(c, '\u{0590}'..='\u{05ff}'),
            Self::Thai => matches!(c, '\u{0e00}'..='\u{0e7f}'),
            Self::Vietnamese => c.to_lowercase().any(|l| VIETNAMESE_CHARS.contains(l)),
            Self::Cyrillic => matches!(c, '\u{0400}'..='\u{04ff}'),
            Self::Devanagari => matches!(c, '\u{0900}'..='\u{097f}'),
            Self::Latin => c.is_ascii_alphabetic(),
            Self::Digits => c.is_ascii_digit(),
            Self::Punctuation => PUNCTUATION_CHARS.contains(c),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ratio of each script present in `text`; empty for blank text
pub fn detect_languages(text: &str) -> BTreeMap<Script, f64> {
    let mut ratios = BTreeMap::new();
    if text.trim().is_empty() {
        return ratios;
    }
    let total = text.chars().count() as f64;
    for script in Script::ALL {
        let count = text.chars().filter(|c| script.matches(*c)).count();
        if count > 0 {
            ratios.insert(script, count as f64 / total);
        }
    }
    ratios
}

/// Coarse Chinese/English breakdown used for structured exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentLanguages {
    pub chinese: f64,
    pub english: f64,
    pub numbers: f64,
    pub punctuation: f64,
}

pub fn detect_content_languages(text: &str) -> ContentLanguages {
    if text.trim().is_empty() {
        return ContentLanguages::default();
    }
    let total = text.chars().count() as f64;
    let ratio = |script: Script| text.chars().filter(|c| script.matches(*c)).count() as f64 / total;
    ContentLanguages {
        chinese: ratio(Script::ChineseSimplified),
        english: ratio(Script::Latin),
        numbers: ratio(Script::Digits),
        punctuation: ratio(Script::Punctuation),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageClass {
    Chinese,
    English,
    Mixed,
}

/// Bucket an element by its Chinese and English ratios.
/// Anything not clearly Chinese or mixed counts as English.
pub fn classify_language(chinese: f64, english: f64) -> LanguageClass {
    if chinese > 0.5 && english < 0.1 {
        LanguageClass::Chinese
    } else if english > 0.5 && chinese < 0.1 {
        LanguageClass::English
    } else if chinese > 0.1 && english > 0.1 {
        LanguageClass::Mixed
    } else {
        LanguageClass::English
    }
}
