// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document parser
//!
//! Drives a [`OcrBackend`] over images and PDF pages and writes per-page
//! outputs under `{output_dir}/{stem}/`.

pub mod options;
pub mod result;

pub use options::{validate_bbox, ParseOptions};
pub use result::PageResult;

use futures::stream::{self, StreamExt};
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::error::{OcrError, Result};
use crate::layout::{
    draw_layout, layout_to_markdown, post_process_output, to_input_space, BBox, PostProcessed,
};
use crate::pdf::{clip_range, rasterize_image_at_dpi, PdfRenderer};
use crate::prompts::{grounding_prompt, PromptMode};
use crate::vision::{fetch_image, load_image, ImageError, OcrBackend, VlmClient};

pub struct DotsOcrParser<B: OcrBackend = VlmClient> {
    backend: B,
    config: ParserConfig,
    renderer: PdfRenderer,
}

impl DotsOcrParser<VlmClient> {
    /// Parser talking to the vLLM server described by `config`
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        let backend = VlmClient::from_config(&config)?;
        Ok(Self::with_backend(backend, config))
    }
}

impl<B: OcrBackend> DotsOcrParser<B> {
    pub fn with_backend(backend: B, config: ParserConfig) -> Self {
        Self {
            backend,
            config,
            renderer: PdfRenderer::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: PdfRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn renderer(&self) -> &PdfRenderer {
        &self.renderer
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config.output_dir = dir.into();
    }

    /// Override the model-input pixel bounds for later calls
    pub fn set_pixel_limits(&mut self, min_pixels: Option<u32>, max_pixels: Option<u32>) -> Result<()> {
        let mut config = self.config.clone();
        config.min_pixels = min_pixels;
        config.max_pixels = max_pixels;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Parse with the default layout mode
    pub async fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<PageResult>> {
        self.parse_file_with(path, &ParseOptions::default()).await
    }

    pub async fn parse_file_with(
        &self,
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<Vec<PageResult>> {
        let path = path.as_ref();
        options.validate()?;
        if !path.is_file() {
            return Err(OcrError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input not found: {}", path.display()),
            )));
        }

        let stem = file_stem(path);
        let save_dir = self.config.output_dir.join(&stem);
        tokio::fs::create_dir_all(&save_dir).await?;

        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("pdf"));

        let started = Instant::now();
        let results = if is_pdf {
            self.parse_pdf(path, &stem, options, &save_dir).await?
        } else {
            self.parse_image(path, &stem, options, &save_dir).await?
        };

        info!(
            "Parsed {} ({} page(s), {}) in {:.2}s",
            path.display(),
            results.len(),
            options.prompt_mode.description(),
            started.elapsed().as_secs_f64()
        );
        Ok(results)
    }

    pub async fn parse_image(
        &self,
        path: &Path,
        filename: &str,
        options: &ParseOptions,
        save_dir: &Path,
    ) -> Result<Vec<PageResult>> {
        let (mut image, _) = load_image(path).map_err(|e| match e {
            ImageError::UnsupportedFormat => {
                OcrError::UnsupportedInput(format!("{} is not an image or PDF", path.display()))
            }
            other => OcrError::Image(other),
        })?;
        if options.fitz_preprocess {
            image = rasterize_image_at_dpi(&image, self.config.dpi);
        }

        let result = self
            .parse_single_image(
                image,
                options.prompt_mode,
                save_dir,
                filename,
                path,
                0,
                options.bbox,
            )
            .await?;
        Ok(vec![result])
    }

    /// Render and parse PDF pages in chunks of `num_thread`, with at most
    /// that many requests in flight. Only one chunk of rendered pages is
    /// held in memory at a time.
    pub async fn parse_pdf(
        &self,
        path: &Path,
        filename: &str,
        options: &ParseOptions,
        save_dir: &Path,
    ) -> Result<Vec<PageResult>> {
        let total = self.renderer.page_count(path).await?;
        let range = clip_range(options.page_range.clone(), total);
        let workers = self.config.num_thread.max(1);
        info!(
            "Parsing {} of {} PDF page(s) with {} workers",
            range.len(),
            total,
            workers
        );

        let mut results = Vec::with_capacity(range.len());
        let mut chunk_start = range.start;
        while chunk_start < range.end {
            let chunk = chunk_start..(chunk_start + workers).min(range.end);
            let pages = self
                .renderer
                .render_span(path, self.config.dpi, chunk.clone())
                .await?;
            debug!("Rendered pages {}..{} of {}", chunk.start, chunk.end, path.display());

            let first_page = chunk.start;
            let page_results: Vec<Result<PageResult>> =
                stream::iter(pages.into_iter().enumerate())
                    .map(move |(i, image)| {
                        let page_no = first_page + i;
                        let save_name = format!("{}_page_{}", filename, page_no);
                        async move {
                            self.parse_single_image(
                                image,
                                options.prompt_mode,
                                save_dir,
                                &save_name,
                                path,
                                page_no,
                                options.bbox,
                            )
                            .await
                        }
                    })
                    .buffer_unordered(workers)
                    .collect()
                    .await;

            for result in page_results {
                results.push(result?);
            }
            chunk_start = chunk.end;
        }
        results.sort_by_key(|r| r.page_no);
        Ok(results)
    }

    /// Run one image through the model and write its outputs
    #[allow(clippy::too_many_arguments)]
    pub async fn parse_single_image(
        &self,
        origin: DynamicImage,
        mode: PromptMode,
        save_dir: &Path,
        save_name: &str,
        source: &Path,
        page_idx: usize,
        bbox: Option<BBox>,
    ) -> Result<PageResult> {
        let input = fetch_image(&origin, self.config.min_pixels, self.config.max_pixels)?;
        let origin_dims = origin.dimensions();
        let input_dims = input.dimensions();

        let prompt = match mode {
            PromptMode::GroundingOcr => {
                let bbox = bbox.ok_or_else(|| OcrError::InvalidBbox(Vec::new()))?;
                grounding_prompt(to_input_space(bbox, origin_dims, input_dims))
            }
            _ => mode.prompt().to_string(),
        };

        debug!(
            "Page {} of {}: {}x{} -> {}x{}",
            page_idx,
            source.display(),
            origin_dims.0,
            origin_dims.1,
            input_dims.0,
            input_dims.1
        );

        let response = self.backend.infer(&input, &prompt).await?;
        let processed = post_process_output(&response, mode, origin_dims, input_dims);

        let mut result = PageResult {
            file_path: source.to_path_buf(),
            page_no: page_idx,
            input_width: input_dims.0,
            input_height: input_dims.1,
            layout_info_path: None,
            layout_image_path: None,
            md_content_path: None,
            md_content_nohf_path: None,
            filtered: false,
        };

        match processed {
            PostProcessed::Cells(cells) => {
                let json_path = save_dir.join(format!("{}.json", save_name));
                tokio::fs::write(&json_path, serde_json::to_string_pretty(&cells)?).await?;
                result.layout_info_path = Some(json_path);

                let image_path = save_dir.join(format!("{}.jpg", save_name));
                draw_layout(&origin, &cells)
                    .save(&image_path)
                    .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
                result.layout_image_path = Some(image_path);

                if mode == PromptMode::LayoutAllEn {
                    let md = layout_to_markdown(&cells, Some(&origin), false)?;
                    let md_nohf = layout_to_markdown(&cells, Some(&origin), true)?;
                    let md_path = save_dir.join(format!("{}.md", save_name));
                    let nohf_path = save_dir.join(format!("{}_nohf.md", save_name));
                    tokio::fs::write(&md_path, md).await?;
                    tokio::fs::write(&nohf_path, md_nohf).await?;
                    result.md_content_path = Some(md_path);
                    result.md_content_nohf_path = Some(nohf_path);
                }
            }
            PostProcessed::Raw(text) => {
                let md_path = save_dir.join(format!("{}.md", save_name));
                tokio::fs::write(&md_path, text).await?;
                result.md_content_path = Some(md_path);
            }
            PostProcessed::Filtered(raw) => {
                warn!("Page {} of {} filtered: layout output unparseable", page_idx, source.display());
                let json_path = save_dir.join(format!("{}.json", save_name));
                let md_path = save_dir.join(format!("{}.md", save_name));
                tokio::fs::write(&json_path, serde_json::to_string(&raw)?).await?;
                tokio::fs::write(&md_path, raw).await?;
                result.layout_info_path = Some(json_path);
                result.md_content_path = Some(md_path);
                result.filtered = true;
            }
        }

        Ok(result)
    }
}

/// File stem used for output directories and names
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
