// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::ParserConfig;
use crate::layout::BBox;
use crate::parser::DotsOcrParser;

/// Server and output settings shared by subcommands.
/// Flags override the config file and `DOTS_OCR_*` variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// TOML file with a [parser] table
    #[arg(long, env = "DOTS_OCR_CONFIG")]
    pub config: Option<PathBuf>,

    /// vLLM server host
    #[arg(long)]
    pub ip: Option<String>,

    /// vLLM server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Served model name
    #[arg(long)]
    pub model_name: Option<String>,

    /// Concurrent page requests for PDFs (4-8 recommended)
    #[arg(long)]
    pub num_thread: Option<usize>,

    /// PDF rendering resolution
    #[arg(long)]
    pub dpi: Option<u32>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub min_pixels: Option<u32>,

    #[arg(long)]
    pub max_pixels: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    /// Defaults, then config file, then environment, then flags
    pub fn load_config(&self) -> Result<ParserConfig> {
        dotenv::dotenv().ok();

        let base = match &self.config {
            Some(path) => ParserConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ParserConfig::default(),
        };
        let mut config = base.apply_env()?;

        if let Some(ip) = &self.ip {
            config.ip = ip.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model_name) = &self.model_name {
            config.model_name = model_name.clone();
        }
        if let Some(num_thread) = self.num_thread {
            config.num_thread = num_thread;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.min_pixels.is_some() {
            config.min_pixels = self.min_pixels;
        }
        if self.max_pixels.is_some() {
            config.max_pixels = self.max_pixels;
        }
        if let Some(timeout) = self.timeout_secs {
            config.request_timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn build_parser(&self) -> Result<DotsOcrParser> {
        let config = self.load_config()?;
        println!("🔌 Inference server: {} (model '{}')", config.endpoint(), config.model_name);
        Ok(DotsOcrParser::new(config)?)
    }
}

/// Parse `x1,y1,x2,y2`
pub fn parse_bbox(s: &str) -> std::result::Result<BBox, String> {
    let values: Vec<f64> = s
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid bbox '{}': {}", s, e))?;
    match values.as_slice() {
        [x1, y1, x2, y2] => Ok([*x1, *y1, *x2, *y2]),
        _ => Err(format!("bbox '{}' must have 4 values: x1,y1,x2,y2", s)),
    }
}
