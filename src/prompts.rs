// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt modes understood by the DotsOCR model
//!
//! Each mode maps to a fixed instruction prompt. The model answers layout
//! prompts with a JSON array of cells and text prompts with plain Markdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OcrError;

const PROMPT_LAYOUT_ALL_EN: &str = r#"Please output the layout information from the PDF image, including each layout element's bbox, its category, and the corresponding text content within the bbox.

1. Bbox format: [x1, y1, x2, y2]

2. Layout Categories: The possible categories are ['Caption', 'Footnote', 'Formula', 'List-item', 'Page-footer', 'Page-header', 'Picture', 'Section-header', 'Table', 'Text', 'Title'].

3. Text Extraction & Formatting Rules:
    - Picture: For the 'Picture' category, the text field should be omitted.
    - Formula: Format its text as LaTeX.
    - Table: Format its text as HTML.
    - All Others (Text, Title, etc.): Format their text as Markdown.

4. Constraints:
    - The output text must be the original text from the image, with no translation.
    - All layout elements must be sorted according to human reading order.

5. Final Output: The entire output must be a single JSON object.
"#;

const PROMPT_LAYOUT_ONLY_EN: &str = "Please output the layout information from this PDF image, including each layout's bbox and its category. The bbox should be in the format [x1, y1, x2, y2]. The layout categories for the PDF document include ['Caption', 'Footnote', 'Formula', 'List-item', 'Page-footer', 'Page-header', 'Picture', 'Section-header', 'Table', 'Text', 'Title']. Do not output the corresponding text. The layout result should be in JSON format.";

const PROMPT_OCR: &str = "Extract the text content from this image.";

const PROMPT_GROUNDING_OCR: &str =
    "Extract text from the given bounding box on the image (format: [x1, y1, x2, y2]).\nBounding Box:\n";

/// Parsing mode selecting what the model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PromptMode {
    /// Full layout detection plus text recognition
    #[default]
    #[serde(rename = "prompt_layout_all_en")]
    LayoutAllEn,
    /// Layout detection without text
    #[serde(rename = "prompt_layout_only_en")]
    LayoutOnlyEn,
    /// Plain text extraction
    #[serde(rename = "prompt_ocr")]
    Ocr,
    /// Text extraction restricted to a bounding box
    #[serde(rename = "prompt_grounding_ocr")]
    GroundingOcr,
}

impl PromptMode {
    pub const ALL: [PromptMode; 4] = [
        PromptMode::LayoutAllEn,
        PromptMode::LayoutOnlyEn,
        PromptMode::Ocr,
        PromptMode::GroundingOcr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LayoutAllEn => "prompt_layout_all_en",
            Self::LayoutOnlyEn => "prompt_layout_only_en",
            Self::Ocr => "prompt_ocr",
            Self::GroundingOcr => "prompt_grounding_ocr",
        }
    }

    /// Instruction text sent to the model
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::LayoutAllEn => PROMPT_LAYOUT_ALL_EN,
            Self::LayoutOnlyEn => PROMPT_LAYOUT_ONLY_EN,
            Self::Ocr => PROMPT_OCR,
            Self::GroundingOcr => PROMPT_GROUNDING_OCR,
        }
    }

    /// Whether the model answers with layout cells (JSON)
    pub fn produces_layout(&self) -> bool {
        matches!(self, Self::LayoutAllEn | Self::LayoutOnlyEn)
    }

    /// Whether the parse writes a Markdown file
    pub fn produces_markdown(&self) -> bool {
        !matches!(self, Self::LayoutOnlyEn)
    }

    /// Short human description used in logs and CLI help
    pub fn description(&self) -> &'static str {
        match self {
            Self::LayoutAllEn => "full layout parsing",
            Self::LayoutOnlyEn => "layout detection only",
            Self::Ocr => "text extraction only",
            Self::GroundingOcr => "region text extraction",
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prompt_layout_all_en" | "layout_all" | "layout-all" => Ok(Self::LayoutAllEn),
            "prompt_layout_only_en" | "layout_only" | "layout-only" => Ok(Self::LayoutOnlyEn),
            "prompt_ocr" | "ocr" => Ok(Self::Ocr),
            "prompt_grounding_ocr" | "grounding" | "grounding_ocr" => Ok(Self::GroundingOcr),
            _ => Err(OcrError::InvalidPromptMode(s.to_string())),
        }
    }
}

/// Build the grounding prompt for a bbox already expressed in model-input pixels
pub fn grounding_prompt(bbox: [f64; 4]) -> String {
    let coords: Vec<String> = bbox.iter().map(|v| format!("{}", v.round() as i64)).collect();
    format!("{}[{}]", PROMPT_GROUNDING_OCR, coords.join(", "))
}
