// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analysis;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod grounding;
pub mod layout;
pub mod parser;
pub mod pdf;
pub mod prompts;
pub mod version;
pub mod vision;

// Re-export main types
pub use batch::{BatchProcessor, BatchSummary, FileResult, PdfProcessor};
pub use config::{ParserConfig, ServeCommand};
pub use error::{OcrError, Result};
pub use grounding::{GroundingProcessor, RegionText};
pub use layout::{BBox, Category, LayoutCell};
pub use parser::{DotsOcrParser, PageResult, ParseOptions};
pub use prompts::PromptMode;
pub use vision::{OcrBackend, VlmClient};
