//! Spatial layout of a heap state onto a multi-row grid
//!
//! The heap's byte range `[0, extent)` is cut into rows of `bytes_per_row`
//! bytes each. A block that crosses a row boundary becomes one segment per
//! row it touches, and every segment remembers the exact byte sub-range it
//! stands for, so the segments of a block always concatenate back to the
//! block's range.
//!
//! ```text
//!  row 0 |[ A  ][  B ......................|
//!  row 1 | ...... B ][ C ][   free   ]     |
//! ```
//!
//! The row count is bounded by the viewport height; large heaps grow
//! `bytes_per_row` rather than the number of rows.

use crate::heap::{format_size, Block, HeapState};
use std::ops::Range;

/// Drawing area available for the heap grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

/// Grid geometry
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub row_height: f64,
    pub row_gap: f64,
    pub padding: f64,
    /// Smallest number of bytes a row may stand for
    pub min_bytes_per_row: u64,
    /// A segment must be wider than this to carry the size label
    pub label_min_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            row_height: 28.0,
            row_gap: 2.0,
            padding: 8.0,
            min_bytes_per_row: 1024,
            label_min_width: 40.0,
        }
    }
}

impl LayoutConfig {
    /// One character cell per row unit, as used by the terminal heap pane
    pub fn terminal() -> Self {
        LayoutConfig {
            row_height: 1.0,
            row_gap: 0.0,
            padding: 0.0,
            min_bytes_per_row: 1024,
            label_min_width: 8.0,
        }
    }

    fn row_pitch(&self) -> f64 {
        self.row_height + self.row_gap
    }
}

/// Axis-aligned rectangle in drawing units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges are inclusive
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// The part of one block that falls inside one row
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub rect: PixelRect,
    pub row: u64,
    /// Bytes of the block covered by this segment
    pub bytes: Range<u64>,
    pub block: Block,
    /// Size label, present on exactly one segment per block
    pub label: Option<String>,
}

/// Result of laying out one heap state
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub bytes_per_row: u64,
    pub max_rows: u64,
    pub row_width: f64,
    pub config: LayoutConfig,
    /// Segments in block order, then row order
    pub segments: Vec<Segment>,
}

impl Layout {
    /// Lay out every block of `state` inside `viewport`
    pub fn compute(state: &HeapState, viewport: Viewport, config: &LayoutConfig) -> Layout {
        let row_width = (viewport.width - 2.0 * config.padding).max(0.0);
        let pitch = config.row_pitch();
        let max_rows = if pitch > 0.0 {
            ((viewport.height - config.padding) / pitch).floor().max(1.0) as u64
        } else {
            1
        };

        let extent = state.extent();
        let bytes_per_row = extent
            .div_ceil(max_rows)
            .max(config.min_bytes_per_row)
            .max(1);

        let mut layout = Layout {
            bytes_per_row,
            max_rows,
            row_width,
            config: config.clone(),
            segments: Vec::new(),
        };

        if extent == 0 {
            return layout;
        }

        for block in &state.blocks {
            layout.place_block(block);
        }

        layout
    }

    fn place_block(&mut self, block: &Block) {
        if block.size == 0 {
            return;
        }

        let bpr = self.bytes_per_row;
        let start = block.offset;
        let end = block.end();
        let first_row = start / bpr;
        let last_row = (end - 1) / bpr;
        let first_segment = self.segments.len();

        for row in first_row..=last_row {
            if row >= self.max_rows {
                break;
            }
            let row_start = row * bpr;
            let draw_start = start.max(row_start);
            let draw_end = end.min(row_start.saturating_add(bpr));
            let x0 = self.x_for(draw_start - row_start);
            let x1 = self.x_for(draw_end - row_start);

            self.segments.push(Segment {
                rect: PixelRect {
                    x: x0,
                    y: self.config.padding + row as f64 * self.config.row_pitch(),
                    width: x1 - x0,
                    height: self.config.row_height,
                },
                row,
                bytes: draw_start..draw_end,
                block: *block,
                label: None,
            });
        }

        let placed = &mut self.segments[first_segment..];
        if let Some(i) = label_slot(placed, self.config.label_min_width) {
            placed[i].label = Some(format_size(block.size));
        }
    }

    fn x_for(&self, byte_in_row: u64) -> f64 {
        self.config.padding + (byte_in_row as f64 / self.bytes_per_row as f64) * self.row_width
    }

    /// First segment containing the point
    pub fn segment_at(&self, x: f64, y: f64) -> Option<&Segment> {
        self.segments.iter().find(|seg| seg.rect.contains(x, y))
    }

    /// First block whose drawn area contains the point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&Block> {
        self.segment_at(x, y).map(|seg| &seg.block)
    }

    /// Heap byte drawn at the point, if the point lies on a row
    pub fn byte_at(&self, x: f64, y: f64) -> Option<u64> {
        let pitch = self.config.row_pitch();
        if pitch <= 0.0 || self.row_width <= 0.0 {
            return None;
        }
        let rel_y = y - self.config.padding;
        let rel_x = x - self.config.padding;
        if rel_y < 0.0 || rel_x < 0.0 || rel_x >= self.row_width {
            return None;
        }
        let row = (rel_y / pitch).floor() as u64;
        if row >= self.max_rows || rel_y - row as f64 * pitch > self.config.row_height {
            return None;
        }
        let within = ((rel_x / self.row_width) * self.bytes_per_row as f64).floor() as u64;
        Some(row * self.bytes_per_row + within.min(self.bytes_per_row - 1))
    }

    /// Inverse of the row mapping: the byte range drawn under `rect`
    pub fn bytes_under(&self, rect: &PixelRect) -> Range<u64> {
        let pitch = self.config.row_pitch();
        let row = if pitch > 0.0 {
            ((rect.y - self.config.padding) / pitch).round().max(0.0) as u64
        } else {
            0
        };
        let row_start = row * self.bytes_per_row;
        if self.row_width <= 0.0 {
            return row_start..row_start;
        }
        let to_byte = |x: f64| {
            let frac = (x - self.config.padding) / self.row_width;
            row_start + (frac * self.bytes_per_row as f64).round().max(0.0) as u64
        };
        to_byte(rect.x)..to_byte(rect.right())
    }

    /// Segments drawn for the block starting at `offset`
    pub fn segments_for(&self, offset: u64) -> impl Iterator<Item = &Segment> {
        self.segments
            .iter()
            .filter(move |seg| seg.block.offset == offset)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Pick the segment that carries the label: the first one wide enough for
/// text, falling back to the widest one.
fn label_slot(segments: &[Segment], min_width: f64) -> Option<usize> {
    if let Some(i) = segments.iter().position(|seg| seg.rect.width > min_width) {
        return Some(i);
    }
    let mut widest: Option<usize> = None;
    for (i, seg) in segments.iter().enumerate() {
        if widest.map_or(true, |w| seg.rect.width > segments[w].rect.width) {
            widest = Some(i);
        }
    }
    widest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(width: f64) -> Segment {
        Segment {
            rect: PixelRect {
                x: 0.0,
                y: 0.0,
                width,
                height: 1.0,
            },
            row: 0,
            bytes: 0..1,
            block: Block::free(0, 1),
            label: None,
        }
    }

    #[test]
    fn test_label_slot_prefers_first_wide_segment() {
        let segs = vec![seg(10.0), seg(50.0), seg(60.0)];
        assert_eq!(label_slot(&segs, 40.0), Some(1));
    }

    #[test]
    fn test_label_slot_falls_back_to_widest() {
        let segs = vec![seg(10.0), seg(30.0), seg(30.0)];
        assert_eq!(label_slot(&segs, 40.0), Some(1));
        assert_eq!(label_slot(&[], 40.0), None);
    }
}
