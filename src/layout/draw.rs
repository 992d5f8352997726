// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Annotated page images

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use super::cell::{BBox, Category, LayoutCell};

const LINE_THICKNESS: u32 = 3;
const TAG_SIZE: u32 = 10;

pub fn category_color(category: &Category) -> Rgb<u8> {
    match category {
        Category::Caption => Rgb([255, 152, 0]),
        Category::Footnote => Rgb([121, 85, 72]),
        Category::Formula => Rgb([244, 67, 54]),
        Category::ListItem => Rgb([0, 188, 212]),
        Category::PageFooter | Category::PageHeader => Rgb([158, 158, 158]),
        Category::Picture => Rgb([255, 193, 7]),
        Category::SectionHeader => Rgb([66, 135, 245]),
        Category::Table => Rgb([76, 175, 80]),
        Category::Text => Rgb([96, 125, 139]),
        Category::Title => Rgb([156, 39, 176]),
        Category::Unknown(_) => Rgb([233, 30, 99]),
    }
}

/// Draw every cell as a colored box with a category tag in its corner
pub fn draw_layout(image: &DynamicImage, cells: &[LayoutCell]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for cell in cells {
        let color = category_color(&cell.category);
        draw_box(&mut canvas, cell.bbox, color, LINE_THICKNESS);
        let tag = Rect::at(cell.bbox[0] as i32, cell.bbox[1] as i32).of_size(TAG_SIZE, TAG_SIZE);
        draw_filled_rect_mut(&mut canvas, tag, color);
    }
    canvas
}

/// Hollow rectangle `thickness` pixels wide, clamped to the canvas
pub fn draw_box(canvas: &mut RgbImage, bbox: BBox, color: Rgb<u8>, thickness: u32) {
    let (w, h) = canvas.dimensions();
    let x = (bbox[0].max(0.0) as u32).min(w);
    let y = (bbox[1].max(0.0) as u32).min(h);
    let bw = (bbox[2].max(0.0) as u32).min(w).saturating_sub(x);
    let bh = (bbox[3].max(0.0) as u32).min(h).saturating_sub(y);

    for t in 0..thickness {
        let inner_w = bw.saturating_sub(2 * t);
        let inner_h = bh.saturating_sub(2 * t);
        if inner_w == 0 || inner_h == 0 {
            break;
        }
        let rect = Rect::at((x + t) as i32, (y + t) as i32).of_size(inner_w, inner_h);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}
