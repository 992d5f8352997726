// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region-restricted OCR
//!
//! Text is read from caller-supplied boxes or from boxes found by a
//! layout-only detection pass.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{OcrError, Result};
use crate::export::{with_suffix, write_text};
use crate::layout::{draw_box, sort_reading_order, BBox, Category};
use crate::parser::{file_stem, DotsOcrParser, ParseOptions};
use crate::prompts::PromptMode;
use crate::vision::{load_image, ImageError, OcrBackend, VlmClient};

/// Categories read by [`GroundingProcessor::detect_then_ocr`] by default
pub static DEFAULT_TARGET_CATEGORIES: [Category; 4] = [
    Category::Text,
    Category::Title,
    Category::Table,
    Category::Formula,
];

const PALETTE: [Rgb<u8>; 8] = [
    Rgb([255, 0, 0]),
    Rgb([0, 128, 0]),
    Rgb([0, 0, 255]),
    Rgb([255, 165, 0]),
    Rgb([128, 0, 128]),
    Rgb([165, 42, 42]),
    Rgb([255, 192, 203]),
    Rgb([128, 128, 128]),
];

/// Text read from one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionText {
    pub bbox: BBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub text: String,
}

impl RegionText {
    pub fn label(&self, index: usize) -> String {
        match &self.category {
            Some(category) => format!("{} {}", category, index + 1),
            None => format!("Region {}", index + 1),
        }
    }
}

#[derive(Serialize)]
struct SavedRegion<'a> {
    region_id: usize,
    bbox: BBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a Category>,
    text: &'a str,
}

#[derive(Serialize)]
struct SavedResults<'a> {
    source_image: &'a Path,
    total_regions: usize,
    results: Vec<SavedRegion<'a>>,
}

/// The four quadrants of a `width x height` image, row by row
pub fn quadrants(width: u32, height: u32) -> [BBox; 4] {
    let (w, h) = (width as f64, height as f64);
    let (hw, hh) = ((width / 2) as f64, (height / 2) as f64);
    [
        [0.0, 0.0, hw, hh],
        [hw, 0.0, w, hh],
        [0.0, hh, hw, h],
        [hw, hh, w, h],
    ]
}

/// Central box spanning the middle half in each direction
pub fn center_region(width: u32, height: u32) -> BBox {
    [
        (width / 4) as f64,
        (height / 4) as f64,
        (3 * width / 4) as f64,
        (3 * height / 4) as f64,
    ]
}

pub struct GroundingProcessor<B: OcrBackend = VlmClient> {
    parser: DotsOcrParser<B>,
}

impl<B: OcrBackend> GroundingProcessor<B> {
    pub fn new(parser: DotsOcrParser<B>) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &DotsOcrParser<B> {
        &self.parser
    }

    /// Trimmed text inside `bbox` (original-image pixels)
    pub async fn ocr_region(&self, path: &Path, bbox: BBox) -> Result<String> {
        let results = self
            .parser
            .parse_file_with(path, &ParseOptions::grounding(bbox))
            .await?;
        match results.first() {
            Some(page) => Ok(page
                .load_markdown()?
                .map(|md| md.trim().to_string())
                .unwrap_or_default()),
            None => Ok(String::new()),
        }
    }

    /// Read each box in turn; failed regions get empty text
    pub async fn ocr_multiple_regions(&self, path: &Path, bboxes: &[BBox]) -> Vec<RegionText> {
        let mut regions = Vec::with_capacity(bboxes.len());
        for (i, bbox) in bboxes.iter().enumerate() {
            info!("Region {}/{}: {:?}", i + 1, bboxes.len(), bbox);
            let text = match self.ocr_region(path, *bbox).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Region {} failed: {}", i + 1, e);
                    String::new()
                }
            };
            regions.push(RegionText {
                bbox: *bbox,
                category: None,
                text,
            });
        }
        regions
    }

    /// Detect layout, then read every cell whose category is in `targets`
    /// (defaults to [`DEFAULT_TARGET_CATEGORIES`])
    pub async fn detect_then_ocr(
        &self,
        path: &Path,
        targets: Option<&[Category]>,
    ) -> Result<Vec<RegionText>> {
        let targets = targets.unwrap_or(&DEFAULT_TARGET_CATEGORIES);
        let detection = self
            .parser
            .parse_file_with(path, &ParseOptions::new(PromptMode::LayoutOnlyEn))
            .await?;
        let Some(page) = detection.first() else {
            return Ok(Vec::new());
        };

        let mut cells: Vec<_> = page
            .load_cells()?
            .into_iter()
            .filter(|c| targets.contains(&c.category))
            .collect();
        sort_reading_order(&mut cells);
        info!("Detected {} target region(s) in {}", cells.len(), path.display());

        let mut regions = Vec::with_capacity(cells.len());
        for cell in cells {
            let text = match self.ocr_region(path, cell.bbox).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("{} region {:?} failed: {}", cell.category, cell.bbox, e);
                    String::new()
                }
            };
            regions.push(RegionText {
                bbox: cell.bbox,
                category: Some(cell.category),
                text,
            });
        }
        Ok(regions)
    }

    /// Draw the regions over the image. Defaults to
    /// `{output_dir}/visualized_{file name}`.
    pub fn visualize_regions(
        &self,
        path: &Path,
        regions: &[RegionText],
        output_path: Option<&Path>,
    ) -> Result<PathBuf> {
        let (image, _) = load_image(path)?;
        let mut canvas = image.to_rgb8();
        for (i, region) in regions.iter().enumerate() {
            draw_box(&mut canvas, region.bbox, PALETTE[i % PALETTE.len()], 3);
        }

        let output = match output_path {
            Some(p) => p.to_path_buf(),
            None => {
                let name = path
                    .file_name()
                    .ok_or_else(|| OcrError::UnsupportedInput(path.display().to_string()))?;
                let mut file = std::ffi::OsString::from("visualized_");
                file.push(name);
                self.parser.output_dir().join(file)
            }
        };
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        canvas
            .save(&output)
            .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
        Ok(output)
    }

    /// Write JSON and TXT results. Defaults to
    /// `{output_dir}/{stem}_grounding_results.json` plus the `.txt` twin.
    pub fn save_results(
        &self,
        path: &Path,
        regions: &[RegionText],
        output_path: Option<&Path>,
    ) -> Result<(PathBuf, PathBuf)> {
        let json_path = match output_path {
            Some(p) => p.to_path_buf(),
            None => with_suffix(
                &self.parser.output_dir().join(file_stem(path)),
                "_grounding_results.json",
            ),
        };
        let txt_path = json_path.with_extension("txt");

        let saved = SavedResults {
            source_image: path,
            total_regions: regions.len(),
            results: regions
                .iter()
                .enumerate()
                .map(|(i, r)| SavedRegion {
                    region_id: i + 1,
                    bbox: r.bbox,
                    category: r.category.as_ref(),
                    text: &r.text,
                })
                .collect(),
        };
        write_text(&json_path, &serde_json::to_string_pretty(&saved)?)?;
        write_text(&txt_path, &results_text(path, regions))?;
        Ok((json_path, txt_path))
    }
}

fn results_text(path: &Path, regions: &[RegionText]) -> String {
    let mut out = format!("Grounding OCR results for: {}\n", path.display());
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    for (i, region) in regions.iter().enumerate() {
        match &region.category {
            Some(category) => {
                let _ = writeln!(out, "Region {} ({}):", i + 1, category);
            }
            None => {
                let _ = writeln!(out, "Region {}:", i + 1);
            }
        }
        let _ = writeln!(out, "  Bbox: {:?}", region.bbox);
        let _ = writeln!(out, "  Text: {}\n", region.text);
    }
    out
}
