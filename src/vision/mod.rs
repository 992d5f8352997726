// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision plumbing for DotsOCR
//!
//! This module provides:
//! - Image loading and resizing to the model's patch grid
//! - The vLLM (OpenAI-compatible) client that runs the model
//! - The `OcrBackend` seam the parser is generic over

pub mod backend;
pub mod image_utils;
pub mod vlm_client;

pub use backend::OcrBackend;
pub use image_utils::{
    decode_image_bytes, detect_format, encode_png_base64, fetch_image, is_image_path, load_image,
    smart_resize, ImageError, ImageInfo, IMAGE_EXTENSIONS, IMAGE_FACTOR, MAX_PIXELS, MIN_PIXELS,
};
pub use vlm_client::{InferenceOutput, ModelCard, SamplingParams, VlmClient};
