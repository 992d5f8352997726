// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;

use super::args::{parse_bbox, ConnectionArgs};
use crate::analysis::{analyze_multilingual, analyze_structured_content};
use crate::export::{
    merge_page_results, save_category_files, save_csv, save_multilingual_results,
    save_structured_text,
};
use crate::layout::BBox;
use crate::parser::{file_stem, ParseOptions};
use crate::prompts::PromptMode;

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Image (.jpg, .jpeg, .png) or PDF to parse
    pub input: PathBuf,

    /// prompt_layout_all_en, prompt_layout_only_en, prompt_ocr or prompt_grounding_ocr
    #[arg(long, default_value = "prompt_layout_all_en")]
    pub mode: PromptMode,

    /// Region for grounding OCR: x1,y1,x2,y2
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Option<BBox>,

    /// First PDF page to parse (1-based)
    #[arg(long)]
    pub first_page: Option<usize>,

    /// Last PDF page to parse (1-based, inclusive)
    #[arg(long)]
    pub last_page: Option<usize>,

    /// Resample images as if rendered from a PDF at the configured DPI
    #[arg(long)]
    pub fitz_preprocess: bool,

    /// Also write CSV, grouped text, per-language and per-category files
    #[arg(long)]
    pub export: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl ParseArgs {
    fn options(&self) -> Result<ParseOptions> {
        let mut options = ParseOptions::new(self.mode).with_fitz_preprocess(self.fitz_preprocess);
        options.bbox = self.bbox;
        if self.first_page.is_some() || self.last_page.is_some() {
            let first = self.first_page.unwrap_or(1);
            if first == 0 {
                return Err(anyhow!("--first-page is 1-based"));
            }
            let last = self.last_page.unwrap_or(usize::MAX);
            if last < first {
                return Err(anyhow!("--last-page must not be before --first-page"));
            }
            options = options.with_page_range(first - 1..last);
        }
        options.validate()?;
        Ok(options)
    }
}

pub async fn run_parse(args: ParseArgs) -> Result<()> {
    let options = args.options()?;
    let parser = args.connection.build_parser()?;

    println!("📄 Parsing {} ({})", args.input.display(), args.mode.description());
    let results = parser.parse_file_with(&args.input, &options).await?;

    for page in &results {
        println!("\n📑 Page {}{}", page.page_no, if page.filtered { " ⚠️ filtered" } else { "" });
        println!("  Model input:  {}x{}", page.input_width, page.input_height);
        if let Some(path) = &page.layout_info_path {
            println!("  Layout JSON:  {}", path.display());
        }
        if let Some(path) = &page.layout_image_path {
            println!("  Layout image: {}", path.display());
        }
        if let Some(path) = &page.md_content_path {
            println!("  Markdown:     {}", path.display());
        }
    }

    if results.len() == 1 {
        if let Some(md) = results[0].load_markdown()? {
            println!("\n{}", md);
        }
    }

    if args.export {
        let merged = merge_page_results(&results);
        let stem = file_stem(&args.input);
        let base = parser.output_dir().join(&stem).join(&stem);

        let structured = analyze_structured_content(&merged.cells);
        let multilingual = analyze_multilingual(&merged.cells);

        let mut written = vec![save_csv(&merged.cells, &base)?, save_structured_text(&merged.cells, &base)?];
        written.extend(save_category_files(&structured, &base)?);
        let ml = save_multilingual_results(&multilingual, &merged.cells, &args.input, &base)?;
        written.push(ml.analysis_json);
        written.push(ml.report);
        written.extend(ml.language_files);

        println!("\n📦 Exported {} file(s):", written.len());
        for path in written {
            println!("  {}", path.display());
        }
    }

    println!("\n✅ Parsed {} page(s)", results.len());
    Ok(())
}
