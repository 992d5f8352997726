// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::cmp::Ordering;

use super::cell::LayoutCell;

/// Sort top-to-bottom then left-to-right and number cells from 1.
/// Ties keep their original order.
pub fn sort_reading_order(cells: &mut [LayoutCell]) {
    cells.sort_by(|a, b| {
        a.bbox[1]
            .partial_cmp(&b.bbox[1])
            .unwrap_or(Ordering::Equal)
            .then(a.bbox[0].partial_cmp(&b.bbox[0]).unwrap_or(Ordering::Equal))
    });
    for (i, cell) in cells.iter_mut().enumerate() {
        cell.reading_order = Some(i as u32 + 1);
    }
}
