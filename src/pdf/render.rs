// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PDF rasterization through poppler (`pdftoppm`, `pdfinfo`)

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{OcrError, Result};
use crate::vision::load_image;

/// Rendered pages wider or taller than this fall back to 72 DPI
pub const MAX_RENDER_SIDE: u32 = 4500;

const POINTS_PER_INCH: f64 = 72.0;

/// Values reported by `pdfinfo`
#[derive(Debug, Clone, PartialEq)]
pub struct PdfMetadata {
    pub page_count: usize,
    /// First page size in points
    pub page_size_pts: Option<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    pdftoppm: PathBuf,
    pdfinfo: PathBuf,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            pdftoppm: PathBuf::from("pdftoppm"),
            pdfinfo: PathBuf::from("pdfinfo"),
        }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use poppler binaries from a specific directory
    pub fn with_tool_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            pdftoppm: dir.join("pdftoppm"),
            pdfinfo: dir.join("pdfinfo"),
        }
    }

    pub async fn metadata(&self, path: &Path) -> Result<PdfMetadata> {
        let output = run_tool(Command::new(&self.pdfinfo).arg(path), "pdfinfo").await?;
        parse_pdfinfo(&String::from_utf8_lossy(&output.stdout))
    }

    pub async fn page_count(&self, path: &Path) -> Result<usize> {
        Ok(self.metadata(path).await?.page_count)
    }

    /// Render pages at `dpi`, in page order.
    ///
    /// `range` is 0-based and end-exclusive; `None` renders every page. The
    /// range is clipped to the document.
    pub async fn render_pages(
        &self,
        path: &Path,
        dpi: u32,
        range: Option<Range<usize>>,
    ) -> Result<Vec<DynamicImage>> {
        let total = self.page_count(path).await?;
        self.render_span(path, dpi, clip_range(range, total)).await
    }

    /// Render pages `range` (0-based, end-exclusive) without consulting
    /// `pdfinfo`; the range must already lie inside the document
    pub async fn render_span(
        &self,
        path: &Path,
        dpi: u32,
        range: Range<usize>,
    ) -> Result<Vec<DynamicImage>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let temp_dir = tempfile::tempdir()?;
        let prefix = temp_dir.path().join("page");

        info!(
            "Rendering pages {}-{} of {} at {} DPI",
            range.start + 1,
            range.end,
            path.display(),
            dpi
        );

        run_tool(
            Command::new(&self.pdftoppm)
                .arg("-png")
                .arg("-r")
                .arg(dpi.to_string())
                .arg("-f")
                .arg((range.start + 1).to_string())
                .arg("-l")
                .arg(range.end.to_string())
                .arg(path)
                .arg(&prefix),
            "pdftoppm",
        )
        .await?;

        let mut files: Vec<PathBuf> = std::fs::read_dir(temp_dir.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |ext| ext == "png"))
            .collect();
        // pdftoppm zero-pads page numbers uniformly within one run
        files.sort();

        let mut pages = Vec::with_capacity(files.len());
        for file in files {
            let (image, _) = load_image(&file)?;
            pages.push(cap_render_size(image, dpi));
        }
        debug!("Rendered {} pages", pages.len());
        Ok(pages)
    }
}

async fn run_tool(command: &mut Command, name: &str) -> Result<Output> {
    let output = command.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            OcrError::PdfTool(format!("{} not found", name))
        } else {
            OcrError::PdfTool(format!("failed to run {}: {}", name, e))
        }
    })?;
    if !output.status.success() {
        return Err(OcrError::PdfTool(format!(
            "{} failed: {}",
            name,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output)
}

/// Parse `pdfinfo` stdout
pub fn parse_pdfinfo(stdout: &str) -> Result<PdfMetadata> {
    let mut page_count = None;
    let mut page_size_pts = None;

    for line in stdout.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "Pages" => page_count = value.trim().parse::<usize>().ok(),
            "Page size" => {
                // "612 x 792 pts (letter)"
                let mut parts = value.split_whitespace();
                let w = parts.next().and_then(|v| v.parse::<f64>().ok());
                let x = parts.next();
                let h = parts.next().and_then(|v| v.parse::<f64>().ok());
                if let (Some(w), Some("x"), Some(h)) = (w, x, h) {
                    page_size_pts = Some((w, h));
                }
            }
            _ => {}
        }
    }

    let page_count = page_count
        .ok_or_else(|| OcrError::PdfTool("pdfinfo output has no page count".to_string()))?;
    Ok(PdfMetadata {
        page_count,
        page_size_pts,
    })
}

/// Pixel size of a page of `pts` points rendered at `dpi`
pub fn points_to_pixels(pts: (f64, f64), dpi: u32) -> (u32, u32) {
    let scale = dpi as f64 / POINTS_PER_INCH;
    (
        (pts.0 * scale).round() as u32,
        (pts.1 * scale).round() as u32,
    )
}

pub fn clip_range(range: Option<Range<usize>>, total: usize) -> Range<usize> {
    match range {
        None => 0..total,
        Some(r) => r.start.min(total)..r.end.min(total),
    }
}

/// Oversized renders drop back to 72 DPI
pub fn cap_render_size(image: DynamicImage, dpi: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    if (w <= MAX_RENDER_SIDE && h <= MAX_RENDER_SIDE) || dpi <= POINTS_PER_INCH as u32 {
        return image;
    }
    let scale = POINTS_PER_INCH / dpi as f64;
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    debug!("Render {}x{} exceeds {}px, using {}x{}", w, h, MAX_RENDER_SIDE, nw, nh);
    image.resize_exact(nw, nh, FilterType::Lanczos3)
}

/// Resample a raster image as if it were a page of `w x h` points rendered
/// at `dpi`, with the same oversize fallback as PDF pages.
pub fn rasterize_image_at_dpi(image: &DynamicImage, dpi: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    let (nw, nh) = points_to_pixels((w as f64, h as f64), dpi);
    if nw > MAX_RENDER_SIDE || nh > MAX_RENDER_SIDE || (nw, nh) == (w, h) {
        return image.clone();
    }
    image.resize_exact(nw.max(1), nh.max(1), FilterType::Lanczos3)
}
