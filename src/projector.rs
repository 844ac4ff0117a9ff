//! Range-preserving projection of candles onto a scrollable pixel viewport.
//!
//! The vertical axis spans the running [`ValueRange`] of everything seen so
//! far, mapped into a fixed fraction of the viewport height. The horizontal
//! axis is a fixed pitch per candle; only candles whose body intersects the
//! visible window are emitted.

use std::ops::Range;

use tracing::{debug, info};

use crate::models::Candle;

/// Fixed geometry of the chart, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub body_width: f32,
    pub wick_width: f32,
    pub spacing: f32,
    /// Share of the viewport height used for candles; the rest is split
    /// evenly into top and bottom margins for the labels.
    pub available_fraction: f32,
    /// How close to the trailing edge still counts as following the tail.
    pub autoscroll_tolerance: f32,
    pub label_height: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            body_width: 16.0,
            wick_width: 1.0,
            spacing: 8.0,
            available_fraction: 0.8,
            autoscroll_tolerance: 10.0,
            label_height: 17.0,
        }
    }
}

impl Layout {
    /// Horizontal distance between the left edges of adjacent bodies.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.spacing + self.body_width
    }

    /// Width needed to lay out `count` candles.
    #[must_use]
    pub fn content_width(&self, count: usize) -> f32 {
        self.pitch() * count as f32 + self.spacing
    }

    #[must_use]
    pub fn body_x(&self, index: usize) -> f32 {
        index as f32 * self.pitch() + self.spacing
    }

    #[must_use]
    pub fn wick_x(&self, index: usize) -> f32 {
        self.body_x(index) + self.body_width / 2.0
    }

    /// Index range that may intersect `[left, right)`, padded by one on
    /// each side; callers still test each body exactly.
    fn candidate_indices(&self, count: usize, left: f32, right: f32) -> Range<usize> {
        let pitch = self.pitch();
        let first = ((left - self.spacing - self.body_width) / pitch).floor().max(0.0) as usize;
        let last = ((right - self.spacing) / pitch).ceil().max(0.0) as usize + 1;
        first.saturating_sub(1).min(count)..last.min(count)
    }
}

/// Axis-aligned rectangle in top-down pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }
}

/// Running extrema over every candle handed to the chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    max: f32,
    min: f32,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            max: 0.0,
            min: f32::INFINITY,
        }
    }
}

impl ValueRange {
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Widens the range to cover `candles`. Never narrows it.
    pub fn update(&mut self, candles: &[Candle]) {
        for candle in candles {
            let high = candle.high();
            let low = candle.low();
            if high > self.max {
                self.max = high;
            }
            if low < self.min {
                self.min = low;
            }
        }
    }

    /// Rebuilds the range from `candles` alone.
    pub fn recompute(&mut self, candles: &[Candle]) {
        *self = Self::default();
        self.update(candles);
    }

    /// Empty until a non-zero maximum has been seen.
    #[must_use]
    pub fn max_label(&self) -> String {
        if self.max == 0.0 {
            String::new()
        } else {
            format!("{:.2}", self.max)
        }
    }

    /// Empty until any minimum has been seen.
    #[must_use]
    pub fn min_label(&self) -> String {
        if self.min == f32::INFINITY {
            String::new()
        } else {
            format!("{:.2}", self.min)
        }
    }
}

/// Affine map between values and vertical pixel positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    max: f32,
    ratio: f32,
    top: f32,
}

impl Scale {
    /// Fits `range` into a band of `band` pixels centred in a viewport of
    /// `viewport_height` pixels.
    ///
    /// Returns `None` when the range is empty or flat, or the band has no
    /// height.
    #[must_use]
    pub fn new(range: &ValueRange, band: f32, viewport_height: f32) -> Option<Self> {
        let span = range.max - range.min;
        if span.is_nan() || span <= 0.0 || band.is_nan() || band <= 0.0 {
            return None;
        }

        let ratio = band / span;
        if !ratio.is_finite() || ratio == 0.0 {
            return None;
        }

        Some(Self {
            max: range.max,
            ratio,
            top: (viewport_height - band) / 2.0,
        })
    }

    /// Pixels per unit of value.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Top margin above the band.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Higher values map to smaller `y`.
    #[must_use]
    pub fn y_of(&self, value: f32) -> f32 {
        (self.max - value) * self.ratio + self.top
    }

    /// Inverse of [`Scale::y_of`].
    #[must_use]
    pub fn value_at(&self, y: f32) -> f32 {
        self.max - (y - self.top) / self.ratio
    }

    /// Pixel height of a value span.
    #[must_use]
    pub fn height_of(&self, span: f32) -> f32 {
        span * self.ratio
    }
}

/// The visible window onto the chart content.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub scroll_x: f32,
    pub width: f32,
    pub height: f32,
    /// Content width as of the last layout pass.
    pub content_width: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll_x: f32) -> Self {
        self.scroll_x = scroll_x;
        self
    }

    #[must_use]
    pub fn with_content_width(mut self, content_width: f32) -> Self {
        self.content_width = content_width;
        self
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.scroll_x + self.width
    }

    /// Largest scroll offset that still fills the viewport.
    #[must_use]
    pub fn max_scroll(&self) -> f32 {
        (self.content_width - self.width).max(0.0)
    }

    /// `true` when the view sits on the trailing edge of the content, or
    /// the content does not fill the view.
    #[must_use]
    pub fn follows_tail(&self, tolerance: f32) -> bool {
        (self.right() - self.content_width).abs() <= tolerance || self.width > self.content_width
    }
}

/// Fill role of an emitted shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandleColor {
    /// Body of a candle that closed above its open.
    Bullish,
    Bearish,
    /// High-low line behind the body.
    Wick,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    pub rect: Rect,
    pub color: CandleColor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub rect: Rect,
    pub text: String,
}

/// Geometry for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub wicks: Vec<Shape>,
    pub bodies: Vec<Shape>,
    /// Top and bottom edges of the candle band.
    pub guides: [Rect; 2],
    pub max_label: Label,
    pub min_label: Label,
    /// Whether the caller should scroll to [`Projection::scroll_target`].
    pub auto_scroll: bool,
    pub scroll_target: Rect,
    pub content_width: f32,
    pub scale: Scale,
}

impl Projection {
    /// Number of candles that made it past culling.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.bodies.len()
    }
}

/// Projects `candles` into `viewport` using the global `range`.
///
/// Culls against `[viewport.scroll_x, viewport.scroll_x + viewport.width)`.
/// `auto_scroll` only reports whether the view sits on the tail of the
/// content laid out by the previous pass (`viewport.content_width`); the
/// offset itself is left to the caller.
///
/// Returns `None` when the range is degenerate or the viewport has no
/// usable height.
#[must_use]
pub fn project(
    layout: &Layout,
    candles: &[Candle],
    range: &ValueRange,
    viewport: &Viewport,
) -> Option<Projection> {
    let band = viewport.height * layout.available_fraction;
    let scale = Scale::new(range, band, viewport.height)?;

    let content_width = layout.content_width(candles.len());
    let auto_scroll = viewport.follows_tail(layout.autoscroll_tolerance);
    let scroll_target = Rect::new(
        (content_width - viewport.width).max(0.0),
        0.0,
        viewport.width,
        viewport.height,
    );
    let left = viewport.scroll_x;
    let right = viewport.right();

    let mut wicks = Vec::new();
    let mut bodies = Vec::new();
    for index in layout.candidate_indices(candles.len(), left, right) {
        let candle = &candles[index];
        let body_x = layout.body_x(index);
        if body_x + layout.body_width < left || body_x >= right {
            continue;
        }

        let (high, low) = (candle.high(), candle.low());
        wicks.push(Shape {
            rect: Rect::new(
                layout.wick_x(index),
                scale.y_of(high),
                layout.wick_width,
                scale.height_of(high - low),
            ),
            color: CandleColor::Wick,
        });

        let (open, close) = (candle.open(), candle.close());
        let (body_top, body_bottom) = (open.max(close), open.min(close));
        bodies.push(Shape {
            rect: Rect::new(
                body_x,
                scale.y_of(body_top),
                layout.body_width,
                scale.height_of(body_top - body_bottom),
            ),
            color: if candle.is_bullish() {
                CandleColor::Bullish
            } else {
                CandleColor::Bearish
            },
        });
    }

    let top = scale.top();
    let bottom = top + band;
    let guides = [
        Rect::new(left, top, viewport.width, 1.0),
        Rect::new(left, bottom, viewport.width, 1.0),
    ];
    let max_label = Label {
        rect: Rect::new(left, top - layout.label_height, viewport.width, layout.label_height),
        text: range.max_label(),
    };
    let min_label = Label {
        rect: Rect::new(left, bottom + 1.0, viewport.width, layout.label_height),
        text: range.min_label(),
    };

    Some(Projection {
        wicks,
        bodies,
        guides,
        max_label,
        min_label,
        auto_scroll,
        scroll_target,
        content_width,
        scale,
    })
}

/// Everything the projector knows about the chart.
#[derive(Clone, Debug, Default)]
pub struct ChartState {
    pub range: ValueRange,
    pub candles: Vec<Candle>,
    pub viewport: Viewport,
}

/// Stateful wrapper around [`project`] that keeps the range, the candle
/// history and the viewport between render passes.
#[derive(Clone, Debug, Default)]
pub struct Projector {
    layout: Layout,
    state: ChartState,
}

impl Projector {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            state: ChartState::default(),
        }
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Widens the running range to cover `candles`.
    pub fn update_range(&mut self, candles: &[Candle]) {
        self.state.range.update(candles);
    }

    /// Installs a freshly emitted candle list.
    ///
    /// A list that continues the current history (same first window, not
    /// shorter) only widens the range. Anything else, such as history
    /// trimmed by retention, rebuilds the range from the new list.
    pub fn replace_candles(&mut self, candles: Vec<Candle>) {
        let continues = match (self.state.candles.first(), candles.first()) {
            (None, _) => true,
            (Some(old), Some(new)) => {
                old.window() == new.window() && candles.len() >= self.state.candles.len()
            }
            (Some(_), None) => false,
        };

        if continues {
            self.update_range(&candles);
        } else {
            self.state.range.recompute(&candles);
            info!(
                candles = candles.len(),
                max = self.state.range.max(),
                min = self.state.range.min(),
                "Candle history replaced, value range recomputed"
            );
        }
        self.state.candles = candles;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = &mut self.state.viewport;
        viewport.width = width;
        viewport.height = height;
        viewport.scroll_x = viewport.scroll_x.clamp(0.0, viewport.max_scroll());
    }

    /// Moves the view, clamped to the laid-out content.
    pub fn scroll_to(&mut self, x: f32) {
        let viewport = &mut self.state.viewport;
        viewport.scroll_x = x.clamp(0.0, viewport.max_scroll());
    }

    pub fn scroll_by(&mut self, dx: f32) {
        self.scroll_to(self.state.viewport.scroll_x + dx);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_to(self.state.viewport.max_scroll());
    }

    /// Runs one render pass.
    ///
    /// A view that followed the tail of the previous pass jumps to the
    /// trailing edge of the current content before culling, so the newest
    /// candle is always drawn.
    pub fn project(&mut self) -> Option<Projection> {
        let content_width = self.layout.content_width(self.state.candles.len());
        let viewport = &mut self.state.viewport;
        if viewport.follows_tail(self.layout.autoscroll_tolerance) {
            viewport.scroll_x = (content_width - viewport.width).max(0.0);
        }
        viewport.content_width = content_width;

        let projection = project(
            &self.layout,
            &self.state.candles,
            &self.state.range,
            &self.state.viewport,
        );
        if projection.is_none() {
            debug!("Degenerate value range, skipping projection");
        }
        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_pitch() {
        let layout = Layout::default();
        assert_eq!(layout.pitch(), 24.0);
        assert_eq!(layout.content_width(0), 8.0);
        assert_eq!(layout.content_width(3), 80.0);
        assert_eq!(layout.body_x(2), 56.0);
        assert_eq!(layout.wick_x(2), 64.0);
    }

    #[test]
    fn candidate_indices_cover_window() {
        let layout = Layout::default();
        let range = layout.candidate_indices(100, 100.0, 300.0);
        assert!(range.start <= 4);
        assert!(range.end >= 13);
        assert!(layout.candidate_indices(2, 100.0, 300.0).is_empty());
    }

    #[test]
    fn labels_empty_until_defined() {
        let range = ValueRange::default();
        assert_eq!(range.max_label(), "");
        assert_eq!(range.min_label(), "");
    }

    #[test]
    fn scale_rejects_flat_and_empty_ranges() {
        assert!(Scale::new(&ValueRange::default(), 80.0, 100.0).is_none());

        let flat = ValueRange {
            max: 5.0,
            min: 5.0,
        };
        assert!(Scale::new(&flat, 80.0, 100.0).is_none());

        let ok = ValueRange {
            max: 10.0,
            min: 0.0,
        };
        assert!(Scale::new(&ok, 0.0, 0.0).is_none());
        assert!(Scale::new(&ok, 80.0, 100.0).is_some());
    }
}
