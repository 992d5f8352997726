// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use super::args::ConnectionArgs;
use crate::batch::{FileStatus, PdfProcessor};
use crate::parser::DotsOcrParser;
use crate::pdf::{PdfInfo, PdfRenderer};
use crate::prompts::PromptMode;

/// Arguments for the pdf-info command
#[derive(Args, Debug)]
pub struct PdfInfoArgs {
    pub input: PathBuf,

    /// Rendering DPI used for the size estimate
    #[arg(long, default_value_t = 200)]
    pub dpi: u32,
}

/// Arguments for the pdf command
#[derive(Args, Debug)]
pub struct PdfArgs {
    /// One or more PDF files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, default_value = "prompt_layout_all_en")]
    pub mode: PromptMode,

    /// First page (1-based); single file only
    #[arg(long)]
    pub start_page: Option<usize>,

    /// Last page (1-based, inclusive); single file only
    #[arg(long)]
    pub end_page: Option<usize>,

    /// Merge pages and write the structured analysis; whole document only
    #[arg(long, conflicts_with_all = ["start_page", "end_page"])]
    pub analyze: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn run_pdf_info(args: PdfInfoArgs) -> Result<()> {
    let renderer = PdfRenderer::default();
    let info = PdfInfo::inspect(&renderer, &args.input, args.dpi).await?;

    println!("📄 {}", info.file_path.display());
    println!("  Size:       {:.2} MB", info.file_size_mb());
    println!("  Pages:      {}", info.page_count);
    if let (Some(w), Some(h)) = (info.page_width, info.page_height) {
        println!("  Page size:  {}x{} px at {} DPI", w, h, info.dpi);
    }
    if let Some(pixels) = info.page_pixels {
        println!("  Pixels:     {}", pixels);
    }
    println!("  Estimate:   ~{}s", info.estimated_processing_secs);
    Ok(())
}

impl PdfArgs {
    /// Page ranges and `--analyze` apply to a single file only
    pub fn check_flags(&self) -> Result<()> {
        if self.inputs.len() > 1 {
            if self.analyze {
                bail!("--analyze takes a single PDF");
            }
            if self.start_page.is_some() || self.end_page.is_some() {
                bail!("--start-page/--end-page take a single PDF");
            }
        }
        Ok(())
    }
}

pub async fn run_pdf(args: PdfArgs) -> Result<()> {
    args.check_flags()?;
    let parser: DotsOcrParser = args.connection.build_parser()?;
    let mut processor = PdfProcessor::new(parser);

    if args.inputs.len() > 1 {
        println!("📚 Processing {} PDF(s)", args.inputs.len());
        let results = processor.batch_process(&args.inputs, args.mode).await;
        for result in &results {
            match result.status {
                FileStatus::Success => println!(
                    "  ✅ {} ({} page(s))",
                    result.file_path.display(),
                    result.page_count
                ),
                FileStatus::Error => println!(
                    "  ❌ {}: {}",
                    result.file_path.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                ),
            }
        }
    } else {
        let path = &args.inputs[0];
        if args.analyze {
            let report = processor.process_document(path, args.mode).await?;
            println!("✅ Parsed {} page(s)", report.pages.len());
            println!("  Elements:   {}", report.merged_info.total_layout_elements);
            println!("  Text chars: {}", report.merged_info.total_text_length);
            println!("  Merged:     {}", report.merged_paths.text.display());
            println!("  Analysis:   {} (session {})", report.structured_dir.display(), report.session_id);
        } else {
            let pages = match (args.start_page, args.end_page) {
                (None, None) => processor.parse_pdf(path, args.mode).await?,
                (start, end) => {
                    let start = start.unwrap_or(1).max(1) - 1;
                    let end = end.unwrap_or(usize::MAX);
                    processor.parse_pages_range(path, start, end, args.mode).await?
                }
            };
            for page in &pages {
                println!(
                    "  📑 Page {}: {}",
                    page.page_no,
                    page.md_content_path
                        .as_ref()
                        .or(page.layout_info_path.as_ref())
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                );
            }
        }
    }

    let stats = processor.stats();
    println!("\n📊 Processing stats");
    println!("  Files:        {}", stats.total_files);
    println!("  Pages:        {}/{}", stats.successful_pages, stats.total_pages);
    println!("  Success rate: {:.1}%", stats.success_rate());
    println!("  Throughput:   {:.2} pages/s", stats.pages_per_second());
    Ok(())
}
