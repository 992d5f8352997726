// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for dots-ocr

/// Full version string with feature description
pub const VERSION: &str = "v0.3.0-grounding-multilingual-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.3.0";

pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 3;
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "layout-parsing",
    "layout-detection",
    "text-ocr",
    "grounding-ocr",
    "pdf-rendering",
    "concurrent-pages",
    "markdown-export",
    "batch-processing",
    "structured-analysis",
    "multilingual-analysis",
    "csv-export",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("dots-ocr {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Full version info as JSON
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
