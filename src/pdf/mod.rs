// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod info;
pub mod render;

pub use info::{PdfInfo, ESTIMATED_SECS_PER_PAGE};
pub use render::{
    cap_render_size, clip_range, parse_pdfinfo, points_to_pixels, rasterize_image_at_dpi,
    PdfMetadata, PdfRenderer, MAX_RENDER_SIDE,
};
