// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod pdf;
pub mod processor;

pub use pdf::{DocumentReport, PdfBatchResult, PdfProcessor, ProcessingStats};
pub use processor::{
    is_supported_input, scan_directory, BatchProcessor, BatchSummary, FileResult, FileStatus,
};
