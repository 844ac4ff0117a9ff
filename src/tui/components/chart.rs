//! Candlestick chart widget.
//!
//! Draws a [`Projection`] into terminal cells. Projection coordinates are
//! pixels; one cell covers [`COLUMN_PIXELS`] by [`ROW_PIXELS`] of them.

use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};

use crate::projector::{CandleColor, Projection, Shape};

/// Horizontal pixels per terminal column.
pub const COLUMN_PIXELS: f32 = 4.0;

/// Vertical pixels per terminal row.
pub const ROW_PIXELS: f32 = 8.0;

/// Widget rendering one projection pass.
pub struct CandleChart<'a> {
    projection: Option<&'a Projection>,
    block: Option<Block<'a>>,
    crosshair_row: Option<u16>,
}

impl<'a> CandleChart<'a> {
    pub fn new(projection: Option<&'a Projection>) -> Self {
        Self {
            projection,
            block: None,
            crosshair_row: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn crosshair(mut self, row: u16) -> Self {
        self.crosshair_row = Some(row);
        self
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let Some(projection) = self.projection else {
            buf.set_string(
                inner.x,
                inner.y,
                "Waiting for candles...",
                Style::default().fg(Color::DarkGray),
            );
            return;
        };

        // Guides and labels are laid out at the scroll origin.
        let origin = projection.guides[0].x;

        for guide in &projection.guides {
            if let Some(rows) = to_cells(guide.y, guide.height, ROW_PIXELS, inner.height) {
                for col in 0..inner.width {
                    buf.set_string(
                        inner.x + col,
                        inner.y + rows.start,
                        "─",
                        Style::default().fg(Color::DarkGray),
                    );
                }
            }
        }

        for shape in projection.wicks.iter().chain(&projection.bodies) {
            draw_shape(shape, origin, inner, buf);
        }

        for label in [&projection.max_label, &projection.min_label] {
            if label.text.is_empty() {
                continue;
            }
            if let Some(rows) = to_cells(label.rect.y, label.rect.height, ROW_PIXELS, inner.height)
            {
                buf.set_stringn(
                    inner.x,
                    inner.y + rows.start,
                    &label.text,
                    inner.width as usize,
                    Style::default().fg(Color::Gray),
                );
            }
        }

        if let Some(row) = self.crosshair_row.filter(|row| *row < inner.height) {
            buf.set_string(
                inner.x + inner.width - 1,
                inner.y + row,
                "◀",
                Style::default().fg(Color::Cyan),
            );
        }
    }
}

fn draw_shape(shape: &Shape, origin: f32, inner: Rect, buf: &mut Buffer) {
    let (symbol, color) = match shape.color {
        CandleColor::Wick => ("│", Color::Gray),
        CandleColor::Bullish => ("█", Color::Green),
        CandleColor::Bearish => ("█", Color::Red),
    };

    let rect = &shape.rect;
    let Some(cols) = to_cells(rect.x - origin, rect.width, COLUMN_PIXELS, inner.width) else {
        return;
    };
    let Some(rows) = to_cells(rect.y, rect.height, ROW_PIXELS, inner.height) else {
        return;
    };

    for row in rows {
        for col in cols.clone() {
            buf.set_string(
                inner.x + col,
                inner.y + row,
                symbol,
                Style::default().fg(color),
            );
        }
    }
}

/// Cells covered by the pixel span `[start, start + len)`, at least one,
/// clipped to `0..limit`.
fn to_cells(start: f32, len: f32, pixels_per_cell: f32, limit: u16) -> Option<Range<u16>> {
    let first = (start / pixels_per_cell).floor();
    let last = ((start + len) / pixels_per_cell).ceil().max(first + 1.0);
    if last <= 0.0 || first >= f32::from(limit) {
        return None;
    }
    Some(first.max(0.0) as u16..last.min(f32::from(limit)) as u16)
}

/// Pixel size of a chart area measured in cells.
#[must_use]
pub fn viewport_pixels(cells: Rect) -> (f32, f32) {
    (
        f32::from(cells.width) * COLUMN_PIXELS,
        f32::from(cells.height) * ROW_PIXELS,
    )
}
