// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod args;
pub mod batch;
pub mod grounding;
pub mod languages;
pub mod parse;
pub mod pdf;
pub mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::version;

/// DotsOCR document parser
#[derive(Parser, Debug)]
#[command(name = "dots-ocr")]
#[command(version = version::VERSION_NUMBER)]
#[command(about = "Parse document images and PDFs with a DotsOCR vLLM server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse one image or PDF
    Parse(parse::ParseArgs),

    /// Parse every image and PDF in a directory, or a list of files
    Batch(batch::BatchArgs),

    /// Show page count, size and time estimate for a PDF
    PdfInfo(pdf::PdfInfoArgs),

    /// Parse PDFs with page ranges, merging and statistics
    Pdf(pdf::PdfArgs),

    /// Read text inside specific regions of an image
    Grounding(grounding::GroundingArgs),

    /// Script and language analysis of parsed content
    Languages(languages::LanguagesArgs),

    /// Check that the vLLM server is up
    Health(server::HealthArgs),

    /// Print (or launch) the vLLM command hosting the model
    ServeCommand(server::ServeArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Parse(args) => parse::run_parse(args).await,
        Commands::Batch(args) => batch::run_batch(args).await,
        Commands::PdfInfo(args) => pdf::run_pdf_info(args).await,
        Commands::Pdf(args) => pdf::run_pdf(args).await,
        Commands::Grounding(args) => grounding::run_grounding(args).await,
        Commands::Languages(args) => languages::run_languages(args).await,
        Commands::Health(args) => server::run_health(args).await,
        Commands::ServeCommand(args) => server::run_serve(args).await,
    }
}
