//! Capabilities the engine needs from whatever draws the chart.
//!
//! The engine never asks a rendering toolkit directly where a bar is. It
//! goes through [`GeometryProvider`], and reports back through
//! [`ChartSurface`] so the host can move rendered rows, swap cursors and
//! react to bar events.

use serde::{Deserialize, Serialize};

use crate::drag::MovedBars;
use crate::model::{Bar, BarId, RowId};

/// Horizontal extent of a rendered bar, relative to its row container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSpan {
    pub left: f64,
    pub width: f64,
}

impl PixelSpan {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Which part of a bar the pointer pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    Body,
    LeftHandle,
    RightHandle,
}

/// Pointer position in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub target: DragTarget,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            target: DragTarget::Body,
        }
    }

    pub fn on(mut self, target: DragTarget) -> Self {
        self.target = target;
        self
    }
}

/// Geometric queries answered by the rendering collaborator.
pub trait GeometryProvider {
    /// Current width of the time axis in pixels, queried on every use.
    fn chart_width(&self) -> Option<f64>;

    /// Rendered span of `bar` inside its row container.
    fn bar_span(&self, bar: &Bar) -> Option<PixelSpan>;

    /// Surface x coordinate of the left edge of `row`'s bar container.
    fn container_left(&self, row: &RowId) -> Option<f64>;

    /// Row under the surface point, if any.
    fn row_at(&self, x: f64, y: f64) -> Option<RowId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarEventKind {
    DragStart,
    Drag,
    DragEnd,
}

/// Notification delivered to the surface while a drag runs.
#[derive(Debug, Clone, Copy)]
pub struct BarEvent<'a> {
    pub kind: BarEventKind,
    pub pointer: PointerEvent,
    pub bar: &'a Bar,
    /// Row the bar was just moved into, on row-change drags.
    pub new_row: Option<&'a RowId>,
    /// Pre-drag state of every bar touched, on drag end.
    pub moved_bars: Option<&'a MovedBars>,
}

/// The rendering collaborator as seen by the drag engine.
pub trait ChartSurface: GeometryProvider {
    /// Move the rendered element of `bar` from one row to another.
    fn reparent(&mut self, _bar: &BarId, _from: &RowId, _to: &RowId) {}

    /// Show or clear the global resize cursor.
    fn set_resize_cursor(&mut self, _active: bool) {}

    fn emit(&mut self, _event: &BarEvent<'_>) {}
}
