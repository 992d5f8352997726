// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types shared across the parser, client and exporters

use thiserror::Error;

use crate::vision::ImageError;

pub type Result<T> = std::result::Result<T, OcrError>;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request to inference server failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Inference server returned no choices")]
    EmptyResponse,

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("PDF rendering failed: {0}")]
    PdfTool(String),

    #[error("Unsupported input file: {0}")]
    UnsupportedInput(String),

    #[error("Unknown prompt mode '{0}'")]
    InvalidPromptMode(String),

    #[error("Invalid bounding box {0:?}: expected [x1, y1, x2, y2] with x1 < x2 and y1 < y2")]
    InvalidBbox(Vec<f64>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl OcrError {
    /// End-user remediation hint for the error, if one applies
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            OcrError::Http(_) | OcrError::Server { .. } | OcrError::EmptyResponse => {
                Some("Check that the vLLM server is running and the model weights are downloaded")
            }
            OcrError::PdfTool(_) => Some("Install poppler-utils (pdftoppm, pdfinfo) to parse PDFs"),
            OcrError::Image(ImageError::TooLarge(..)) => {
                Some("Lower the DPI or max_pixels to reduce memory usage")
            }
            _ => None,
        }
    }
}
