// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parser configuration
//!
//! Resolution order: built-in defaults, then an optional TOML file
//! (`[parser]` table), then `DOTS_OCR_*` environment variables. CLI flags
//! are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{OcrError, Result};
use crate::vision::{MAX_PIXELS, MIN_PIXELS};

/// Prefix for environment overrides, e.g. `DOTS_OCR_PORT`
pub const ENV_PREFIX: &str = "DOTS_OCR_";

/// Settings for talking to the inference server and writing results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// vLLM server host
    pub ip: String,
    /// vLLM server port
    pub port: u16,
    /// Served model name (`--served-model-name`)
    pub model_name: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
    /// Concurrent page requests when parsing PDFs
    pub num_thread: usize,
    /// PDF rasterization resolution
    pub dpi: u32,
    pub output_dir: PathBuf,
    pub min_pixels: Option<u32>,
    pub max_pixels: Option<u32>,
    pub request_timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 8000,
            model_name: "model".to_string(),
            temperature: 0.1,
            top_p: 1.0,
            max_completion_tokens: 16384,
            num_thread: 4,
            dpi: 200,
            output_dir: PathBuf::from("./output"),
            min_pixels: None,
            max_pixels: None,
            request_timeout_secs: 300,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    parser: Option<ParserConfig>,
}

impl ParserConfig {
    /// Base URL of the inference server
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.ip, self.port)
    }

    /// Load configuration from a TOML file with a `[parser]` table
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| OcrError::Config(e.to_string()))?;
        Ok(file.parser.unwrap_or_default())
    }

    /// Defaults overridden by `DOTS_OCR_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Apply `DOTS_OCR_*` environment overrides
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Apply overrides from a key lookup (`IP`, `PORT`, `DPI`, ...)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("IP") {
            self.ip = val;
        }
        if let Some(val) = lookup("PORT") {
            self.port = parse_value("PORT", &val)?;
        }
        if let Some(val) = lookup("MODEL_NAME") {
            self.model_name = val;
        }
        if let Some(val) = lookup("TEMPERATURE") {
            self.temperature = parse_value("TEMPERATURE", &val)?;
        }
        if let Some(val) = lookup("TOP_P") {
            self.top_p = parse_value("TOP_P", &val)?;
        }
        if let Some(val) = lookup("MAX_COMPLETION_TOKENS") {
            self.max_completion_tokens = parse_value("MAX_COMPLETION_TOKENS", &val)?;
        }
        if let Some(val) = lookup("NUM_THREAD") {
            self.num_thread = parse_value("NUM_THREAD", &val)?;
        }
        if let Some(val) = lookup("DPI") {
            self.dpi = parse_value("DPI", &val)?;
        }
        if let Some(val) = lookup("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("MIN_PIXELS") {
            self.min_pixels = Some(parse_value("MIN_PIXELS", &val)?);
        }
        if let Some(val) = lookup("MAX_PIXELS") {
            self.max_pixels = Some(parse_value("MAX_PIXELS", &val)?);
        }
        if let Some(val) = lookup("TIMEOUT_SECS") {
            self.request_timeout_secs = parse_value("TIMEOUT_SECS", &val)?;
        }
        Ok(self)
    }

    /// Validate ranges before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.ip.trim().is_empty() {
            return Err(OcrError::Config("ip must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(OcrError::Config("port must be non-zero".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(OcrError::Config(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(OcrError::Config(format!(
                "top_p must be within (0, 1], got {}",
                self.top_p
            )));
        }
        if self.num_thread == 0 {
            return Err(OcrError::Config("num_thread must be at least 1".to_string()));
        }
        if !(36..=1200).contains(&self.dpi) {
            return Err(OcrError::Config(format!(
                "dpi must be within [36, 1200], got {}",
                self.dpi
            )));
        }
        if let Some(min) = self.min_pixels {
            if min < MIN_PIXELS {
                return Err(OcrError::Config(format!(
                    "min_pixels must be at least {}",
                    MIN_PIXELS
                )));
            }
        }
        if let Some(max) = self.max_pixels {
            if max > MAX_PIXELS {
                return Err(OcrError::Config(format!(
                    "max_pixels must be at most {}",
                    MAX_PIXELS
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_pixels, self.max_pixels) {
            if min > max {
                return Err(OcrError::Config(format!(
                    "min_pixels ({}) exceeds max_pixels ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, val: &str) -> Result<T> {
    val.trim().parse().map_err(|_| {
        OcrError::Config(format!("invalid value '{}' for {}{}", val, ENV_PREFIX, key))
    })
}
