// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Turning raw model responses into layout cells

use serde_json::Value;
use tracing::{debug, warn};

use super::cell::{BBox, Category, LayoutCell};
use crate::prompts::PromptMode;

/// Outcome of post-processing one model response
#[derive(Debug, Clone, PartialEq)]
pub enum PostProcessed {
    /// Layout cells in original-image coordinates
    Cells(Vec<LayoutCell>),
    /// Text modes pass the response through
    Raw(String),
    /// Layout response that could not be parsed, kept verbatim
    Filtered(String),
}

impl PostProcessed {
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Filtered(_))
    }
}

/// Interpret a response for `mode`.
///
/// `origin` and `input` are `(width, height)` of the original image and of
/// the resized image the model saw. Bboxes are mapped from `input` to
/// `origin` and clamped to the image.
pub fn post_process_output(
    response: &str,
    mode: PromptMode,
    origin: (u32, u32),
    input: (u32, u32),
) -> PostProcessed {
    if !mode.produces_layout() {
        return PostProcessed::Raw(response.to_string());
    }

    let body = strip_code_fence(response);
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!("Layout response is not valid JSON ({}), keeping raw output", e);
            return PostProcessed::Filtered(response.to_string());
        }
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        _ => {
            warn!("Layout response is neither a list nor an object");
            return PostProcessed::Filtered(response.to_string());
        }
    };

    let total = items.len();
    let cells: Vec<LayoutCell> = items
        .iter()
        .filter_map(|item| parse_cell(item, origin, input))
        .collect();

    if cells.len() < total {
        debug!("Dropped {} malformed layout cells", total - cells.len());
    }

    PostProcessed::Cells(cells)
}

/// Remove a surrounding ```json fence if present
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_cell(item: &Value, origin: (u32, u32), input: (u32, u32)) -> Option<LayoutCell> {
    let obj = item.as_object()?;
    let raw = obj.get("bbox")?.as_array()?;
    if raw.len() != 4 {
        return None;
    }
    let mut bbox: BBox = [0.0; 4];
    for (slot, v) in bbox.iter_mut().zip(raw) {
        let n = v.as_f64()?;
        if !n.is_finite() {
            return None;
        }
        *slot = n;
    }

    let bbox = scale_bbox(bbox, origin, input)?;
    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .map(Category::from)
        .unwrap_or_else(|| Category::Unknown(String::new()));
    let text = obj.get("text").and_then(Value::as_str).map(str::to_string);

    Some(LayoutCell::new(bbox, category, text))
}

/// Map a bbox from `input` pixel space to `origin`, clamped.
/// Returns `None` when the clamped box has no area.
pub fn scale_bbox(bbox: BBox, origin: (u32, u32), input: (u32, u32)) -> Option<BBox> {
    let (ow, oh) = (origin.0 as f64, origin.1 as f64);
    let (iw, ih) = (input.0.max(1) as f64, input.1.max(1) as f64);
    let sx = ow / iw;
    let sy = oh / ih;

    let x1 = (bbox[0].min(bbox[2]) * sx).clamp(0.0, ow);
    let y1 = (bbox[1].min(bbox[3]) * sy).clamp(0.0, oh);
    let x2 = (bbox[0].max(bbox[2]) * sx).clamp(0.0, ow);
    let y2 = (bbox[1].max(bbox[3]) * sy).clamp(0.0, oh);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some([x1.round(), y1.round(), x2.round(), y2.round()])
}

/// Map a bbox from original-image pixels into model-input pixels
pub fn to_input_space(bbox: BBox, origin: (u32, u32), input: (u32, u32)) -> BBox {
    let sx = input.0 as f64 / origin.0.max(1) as f64;
    let sy = input.1 as f64 / origin.1.max(1) as f64;
    [bbox[0] * sx, bbox[1] * sy, bbox[2] * sx, bbox[3] * sy]
}
