// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cell;
pub mod draw;
pub mod markdown;
pub mod order;
pub mod postprocess;

pub use cell::{BBox, Category, LayoutCell};
pub use draw::{category_color, draw_box, draw_layout};
pub use markdown::{formula_to_markdown, layout_to_markdown, strip_math_delimiters};
pub use order::sort_reading_order;
pub use postprocess::{post_process_output, scale_bbox, strip_code_fence, to_input_space, PostProcessed};
