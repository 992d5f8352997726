// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading, model-input resizing and encoding for OCR requests

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Maximum encoded image file size (50MB)
pub const MAX_IMAGE_SIZE: usize = 50 * 1024 * 1024;

/// Model patch size; resized dimensions are multiples of this
pub const IMAGE_FACTOR: u32 = 28;

/// Smallest pixel area sent to the model
pub const MIN_PIXELS: u32 = 3136;

/// Largest pixel area sent to the model
pub const MAX_PIXELS: u32 = 11_289_600;

/// Images with a longer/shorter side ratio above this are rejected
pub const MAX_ASPECT_RATIO: f64 = 200.0;

/// Image file extensions accepted as parser input
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Custom error types for image processing
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Aspect ratio must be smaller than {max}, got {actual:.1}")]
    AspectRatio { max: f64, actual: f64 },

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Load an image file from disk
pub fn load_image(path: impl AsRef<Path>) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_image_bytes(&bytes)
}

/// Decode raw image bytes
///
/// # Returns
/// * `Ok((DynamicImage, ImageInfo))` - The decoded image and metadata
/// * `Err(ImageError)` - If decoding fails
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// Whether a path has one of the accepted image extensions
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn round_by_factor(value: f64, factor: u32) -> u32 {
    ((value / factor as f64).round_ties_even() as u32) * factor
}

fn ceil_by_factor(value: f64, factor: u32) -> u32 {
    ((value / factor as f64).ceil() as u32) * factor
}

fn floor_by_factor(value: f64, factor: u32) -> u32 {
    ((value / factor as f64).floor() as u32) * factor
}

/// Compute model-input dimensions for an image
///
/// Both sides become multiples of `factor` and the area is kept within
/// `[min_pixels, max_pixels]` while approximately preserving aspect ratio.
///
/// # Returns
/// `(height, width)` of the resized image
pub fn smart_resize(
    height: u32,
    width: u32,
    factor: u32,
    min_pixels: u32,
    max_pixels: u32,
) -> Result<(u32, u32), ImageError> {
    if height == 0 || width == 0 {
        return Err(ImageError::EmptyData);
    }

    let (h, w) = (height as f64, width as f64);
    let ratio = h.max(w) / h.min(w);
    if ratio > MAX_ASPECT_RATIO {
        return Err(ImageError::AspectRatio {
            max: MAX_ASPECT_RATIO,
            actual: ratio,
        });
    }

    let mut h_bar = factor.max(round_by_factor(h, factor));
    let mut w_bar = factor.max(round_by_factor(w, factor));
    let area = h_bar as u64 * w_bar as u64;

    if area > max_pixels as u64 {
        let beta = (h * w / max_pixels as f64).sqrt();
        h_bar = factor.max(floor_by_factor(h / beta, factor));
        w_bar = factor.max(floor_by_factor(w / beta, factor));
    } else if area < min_pixels as u64 {
        let beta = (min_pixels as f64 / (h * w)).sqrt();
        h_bar = ceil_by_factor(h * beta, factor);
        w_bar = ceil_by_factor(w * beta, factor);
    }

    Ok((h_bar, w_bar))
}

/// Resize an image to the dimensions the model expects
///
/// `min_pixels`/`max_pixels` fall back to [`MIN_PIXELS`]/[`MAX_PIXELS`].
pub fn fetch_image(
    image: &DynamicImage,
    min_pixels: Option<u32>,
    max_pixels: Option<u32>,
) -> Result<DynamicImage, ImageError> {
    let (width, height) = image.dimensions();
    let (new_h, new_w) = smart_resize(
        height,
        width,
        IMAGE_FACTOR,
        min_pixels.unwrap_or(MIN_PIXELS),
        max_pixels.unwrap_or(MAX_PIXELS),
    )?;

    if new_h == height && new_w == width {
        return Ok(image.clone());
    }

    tracing::debug!(
        "Resizing image {}x{} -> {}x{} for model input",
        width,
        height,
        new_w,
        new_h
    );
    Ok(image.resize_exact(new_w, new_h, FilterType::Lanczos3))
}

/// PNG-encode an image and return it as base64
pub fn encode_png_base64(image: &DynamicImage) -> Result<String, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(STANDARD.encode(buffer.into_inner()))
}
