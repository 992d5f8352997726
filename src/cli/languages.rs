// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use super::args::ConnectionArgs;
use crate::analysis::{analyze_multilingual, analyze_structured_content};
use crate::export::{language_report, merge_page_results, save_multilingual_results};
use crate::layout::LayoutCell;
use crate::parser::file_stem;

/// Arguments for the languages command
#[derive(Args, Debug)]
pub struct LanguagesArgs {
    /// A layout `.json` written by an earlier parse, or an image/PDF to parse first
    pub input: PathBuf,

    /// Write the analysis, report and per-language files next to the input
    #[arg(long)]
    pub save: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

fn is_layout_json(path: &Path) -> bool {
    path.extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("json"))
}

fn read_layout_json(path: &Path) -> Result<Vec<LayoutCell>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a layout cell array", path.display()))
}

pub async fn run_languages(args: LanguagesArgs) -> Result<()> {
    let (cells, base) = if is_layout_json(&args.input) {
        let cells = read_layout_json(&args.input)?;
        (cells, args.input.with_extension(""))
    } else {
        let parser = args.connection.build_parser()?;
        let pages = parser.parse_file(&args.input).await?;
        let stem = file_stem(&args.input);
        let base = parser.output_dir().join(&stem).join(&stem);
        (merge_page_results(&pages).cells, base)
    };

    let multilingual = analyze_multilingual(&cells);
    let structured = analyze_structured_content(&cells);

    println!("{}", language_report(&multilingual));
    println!("🈶 Chinese elements: {}", structured.text_by_type.chinese_text.len());
    println!("🔤 English elements: {}", structured.text_by_type.english_text.len());
    println!("🔀 Mixed elements:   {}", structured.text_by_type.mixed_text.len());

    if args.save {
        let paths = save_multilingual_results(&multilingual, &cells, &args.input, &base)?;
        println!("\n💾 Analysis: {}", paths.analysis_json.display());
        println!("   Report:   {}", paths.report.display());
        for file in paths.language_files {
            println!("   {}", file.display());
        }
    }
    Ok(())
}
