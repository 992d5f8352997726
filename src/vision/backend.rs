// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use async_trait::async_trait;
use image::DynamicImage;

use crate::error::Result;

/// Anything that can run DotsOCR on an image and return the raw model output
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Run inference on an already resized image
    async fn infer(&self, image: &DynamicImage, prompt: &str) -> Result<String>;

    /// Name of the model answering requests
    fn model_name(&self) -> String;
}
