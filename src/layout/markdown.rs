// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Markdown rendering of layout cells

use image::{DynamicImage, GenericImageView};

use super::cell::{BBox, Category, LayoutCell};
use crate::vision::{encode_png_base64, ImageError};

/// Render cells as Markdown blocks separated by blank lines.
///
/// Pictures are embedded as base64 PNG crops of `image` when one is given
/// and skipped otherwise. With `no_page_hf` page headers and footers are
/// left out.
pub fn layout_to_markdown(
    cells: &[LayoutCell],
    image: Option<&DynamicImage>,
    no_page_hf: bool,
) -> Result<String, ImageError> {
    let mut blocks = Vec::with_capacity(cells.len());

    for cell in cells {
        if no_page_hf && cell.category.is_page_furniture() {
            continue;
        }
        match cell.category {
            Category::Picture => {
                if let Some(image) = image {
                    if let Some(crop) = crop_cell(image, cell.bbox) {
                        let data = encode_png_base64(&crop)?;
                        blocks.push(format!("![](data:image/png;base64,{})", data));
                    }
                }
            }
            Category::Formula => {
                let text = cell.text_or_empty().trim();
                if !text.is_empty() {
                    blocks.push(formula_to_markdown(text));
                }
            }
            _ => {
                let text = cell.text_or_empty().trim();
                if !text.is_empty() {
                    blocks.push(text.to_string());
                }
            }
        }
    }

    Ok(blocks.join("\n\n"))
}

/// Strip `$$`, `$`, `\[ \]` and `\( \)` wrappers from LaTeX
pub fn strip_math_delimiters(text: &str) -> &str {
    let text = text.trim();
    for (open, close) in [("$$", "$$"), ("\\[", "\\]"), ("\\(", "\\)"), ("$", "$")] {
        if text.len() >= open.len() + close.len() && text.starts_with(open) && text.ends_with(close)
        {
            return text[open.len()..text.len() - close.len()].trim();
        }
    }
    text
}

/// Display-math block for a formula cell
pub fn formula_to_markdown(text: &str) -> String {
    format!("$$\n{}\n$$", strip_math_delimiters(text))
}

fn crop_cell(image: &DynamicImage, bbox: BBox) -> Option<DynamicImage> {
    let (w, h) = image.dimensions();
    let x1 = (bbox[0].max(0.0) as u32).min(w);
    let y1 = (bbox[1].max(0.0) as u32).min(h);
    let x2 = (bbox[2].max(0.0) as u32).min(w);
    let y2 = (bbox[3].max(0.0) as u32).min(h);
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(image.crop_imm(x1, y1, x2 - x1, y2 - y1))
}
