// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use dots_ocr::cli::{execute, Cli};
use dots_ocr::OcrError;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::debug!("{}", dots_ocr::version::get_version_string());

    match execute(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            if let Some(hint) = e.downcast_ref::<OcrError>().and_then(OcrError::remediation) {
                eprintln!("💡 {}", hint);
            }
            std::process::exit(1);
        }
    }
}
