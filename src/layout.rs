use crate::model::{Bar, RowId, TimeMapping};
use crate::surface::{GeometryProvider, PixelSpan};

/// Stacked-row geometry: every row is a full-width track of equal height,
/// and bars sit where their times map on the current width.
#[derive(Debug, Clone)]
pub struct TimelineLayout {
    mapping: TimeMapping,
    rows: Vec<RowId>,
    /// Surface x of the bar containers' left edge.
    pub origin_x: f64,
    /// Surface y of the first row's top edge.
    pub origin_y: f64,
    pub width: f64,
    pub row_height: f64,
}

impl TimelineLayout {
    pub fn new(mapping: TimeMapping, rows: Vec<RowId>, width: f64, row_height: f64) -> Self {
        Self {
            mapping,
            rows,
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            row_height,
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    pub fn mapping(&self) -> &TimeMapping {
        &self.mapping
    }

    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Surface y of the top edge of `row`.
    pub fn row_top(&self, row: &RowId) -> Option<f64> {
        self.rows
            .iter()
            .position(|r| r == row)
            .map(|i| self.origin_y + i as f64 * self.row_height)
    }

    /// Total height of all rows.
    pub fn total_height(&self) -> f64 {
        self.rows.len() as f64 * self.row_height
    }
}

impl GeometryProvider for TimelineLayout {
    fn chart_width(&self) -> Option<f64> {
        (self.width > 0.0).then_some(self.width)
    }

    fn bar_span(&self, bar: &Bar) -> Option<PixelSpan> {
        let width = self.chart_width()?;
        let left = self.mapping.time_to_position(bar.start, width);
        let right = self.mapping.time_to_position(bar.end, width);
        Some(PixelSpan::new(left, right - left))
    }

    fn container_left(&self, row: &RowId) -> Option<f64> {
        self.rows.contains(row).then_some(self.origin_x)
    }

    fn row_at(&self, x: f64, y: f64) -> Option<RowId> {
        if x < self.origin_x || x > self.origin_x + self.width || y < self.origin_y {
            return None;
        }
        let index = ((y - self.origin_y) / self.row_height).floor() as usize;
        self.rows.get(index).cloned()
    }
}
