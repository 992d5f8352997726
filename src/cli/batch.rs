// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;

use super::args::ConnectionArgs;
use crate::batch::{BatchProcessor, FileStatus};
use crate::prompts::PromptMode;

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory to scan, or individual files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, default_value = "prompt_layout_all_en")]
    pub mode: PromptMode,

    /// Descend into subdirectories
    #[arg(long, short = 'r')]
    pub recursive: bool,

    /// Where to write the JSON summary (default: {output_dir}/batch_summary.json)
    #[arg(long)]
    pub summary: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn run_batch(args: BatchArgs) -> Result<()> {
    let parser = args.connection.build_parser()?;
    let summary_path = args
        .summary
        .clone()
        .unwrap_or_else(|| parser.output_dir().join("batch_summary.json"));
    let mut processor = BatchProcessor::new(parser);

    if args.inputs.len() == 1 && args.inputs[0].is_dir() {
        println!("📂 Scanning {}", args.inputs[0].display());
        processor
            .process_directory(&args.inputs[0], args.mode, args.recursive)
            .await?;
    } else {
        if let Some(dir) = args.inputs.iter().find(|p| p.is_dir()) {
            return Err(anyhow!(
                "{} is a directory; pass a single directory or a list of files",
                dir.display()
            ));
        }
        processor.process_file_list(&args.inputs, args.mode).await;
    }

    let summary = processor.save_summary(&summary_path)?;
    for result in &summary.results {
        match result.status {
            FileStatus::Success => println!(
                "  ✅ {} ({} page(s), {:.1}s)",
                result.file_path.display(),
                result.page_count,
                result.processing_time
            ),
            FileStatus::Error => println!(
                "  ❌ {}: {}",
                result.file_path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    println!("\n📊 Batch summary");
    println!("  Files:      {}", summary.total_files);
    println!("  Successful: {}", summary.successful_files);
    println!("  Failed:     {}", summary.failed_files);
    println!("  Pages:      {}", summary.total_pages);
    println!("  Time:       {:.1}s", summary.total_processing_time);
    println!("  Summary:    {}", summary_path.display());
    Ok(())
}
