use tracing::trace;

use crate::config::ChartConfig;
use crate::error::{GanttError, GanttResult};
use crate::model::{BarId, Chart, RowId, TimeMapping};
use crate::surface::{ChartSurface, DragTarget, GeometryProvider, PointerEvent};

/// What a pointer press on a bar does while it is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Body press: translate the bar, possibly into another row.
    Move,
    /// Left handle: move the start, keep the end.
    ResizeLeft,
    /// Right handle: move the end, keep the start.
    ResizeRight,
}

impl DragMode {
    /// Handles only resize bars that have them; any other press moves.
    pub fn for_target(target: DragTarget, has_handles: bool) -> Self {
        match target {
            DragTarget::LeftHandle if has_handles => DragMode::ResizeLeft,
            DragTarget::RightHandle if has_handles => DragMode::ResizeRight,
            _ => DragMode::Move,
        }
    }
}

/// Changes applied by one pointer move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUpdate {
    /// Row the bar was moved into.
    pub new_row: Option<RowId>,
    pub times_changed: bool,
}

impl SessionUpdate {
    pub fn is_empty(&self) -> bool {
        self.new_row.is_none() && !self.times_changed
    }
}

pub(crate) fn chart_width<G: GeometryProvider + ?Sized>(geometry: &G) -> GanttResult<f64> {
    geometry
        .chart_width()
        .filter(|w| *w > 0.0)
        .ok_or_else(|| GanttError::Configuration("chart width is not available".into()))
}

/// One bar following the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    bar: BarId,
    mode: DragMode,
    /// Pointer distance from the bar's left edge at press time.
    cursor_offset_x: f64,
    ends_transaction: bool,
}

impl DragSession {
    /// Opens a session for `bar_id` from the press in `event`.
    pub fn start<S: ChartSurface + ?Sized>(
        chart: &Chart,
        surface: &mut S,
        bar_id: &BarId,
        event: &PointerEvent,
        ends_transaction: bool,
    ) -> GanttResult<Self> {
        let bar = chart.try_bar(bar_id)?;
        let container = surface
            .container_left(&bar.row)
            .ok_or_else(|| GanttError::UnknownRow(bar.row.clone()))?;
        let span = surface.bar_span(bar).ok_or_else(|| {
            GanttError::Configuration(format!("bar {bar_id} has no rendered span"))
        })?;

        let mode = DragMode::for_target(event.target, bar.has_handles);
        if mode != DragMode::Move {
            surface.set_resize_cursor(true);
        }
        Ok(Self {
            bar: bar_id.clone(),
            mode,
            cursor_offset_x: event.x - (container + span.left),
            ends_transaction,
        })
    }

    pub fn bar(&self) -> &BarId {
        &self.bar
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Only the session of the pressed bar closes the transaction.
    pub fn ends_transaction(&self) -> bool {
        self.ends_transaction
    }

    /// Applies a pointer move to the bar.
    pub fn update<S: ChartSurface + ?Sized>(
        &self,
        chart: &mut Chart,
        surface: &mut S,
        config: &ChartConfig,
        mapping: &TimeMapping,
        event: &PointerEvent,
    ) -> GanttResult<SessionUpdate> {
        match self.mode {
            DragMode::Move => self.drag_body(chart, surface, config, mapping, event),
            DragMode::ResizeLeft => self.drag_left_edge(chart, surface, config, mapping, event),
            DragMode::ResizeRight => self.drag_right_edge(chart, surface, config, mapping, event),
        }
    }

    /// Releases the cursor affordance taken at start.
    pub fn finish<S: ChartSurface + ?Sized>(&self, surface: &mut S) {
        if self.mode != DragMode::Move {
            surface.set_resize_cursor(false);
        }
    }

    fn drag_body<S: ChartSurface + ?Sized>(
        &self,
        chart: &mut Chart,
        surface: &mut S,
        config: &ChartConfig,
        mapping: &TimeMapping,
        event: &PointerEvent,
    ) -> GanttResult<SessionUpdate> {
        let width = chart_width(&*surface)?;
        let mut update = SessionUpdate::default();

        let current_row = chart.try_bar(&self.bar)?.row.clone();
        if let Some(row) = surface.row_at(event.x, event.y) {
            if row != current_row && chart.has_row(&row) {
                surface.reparent(&self.bar, &current_row, &row);
                chart.try_bar_mut(&self.bar)?.row = row.clone();
                update.new_row = Some(row);
            }
        }

        let bar = chart.try_bar(&self.bar)?;
        let (Some(container), Some(span)) = (surface.container_left(&bar.row), surface.bar_span(bar)) else {
            return Ok(update);
        };
        let x_start = event.x - container - self.cursor_offset_x;
        let x_end = x_start + span.width;

        if config.push_on_overlap && bar.drag_limits.excludes(x_start, x_end) {
            trace!(bar = %self.bar, x_start, x_end, "move blocked by drag limit");
            return Ok(update);
        }

        let start = mapping.position_to_time(x_start, width)?;
        let bar = chart.try_bar_mut(&self.bar)?;
        let end = start + bar.gap();
        if (start, end) != (bar.start, bar.end) {
            bar.start = start;
            bar.end = end;
            update.times_changed = true;
        }
        Ok(update)
    }

    fn drag_left_edge<S: ChartSurface + ?Sized>(
        &self,
        chart: &mut Chart,
        surface: &mut S,
        config: &ChartConfig,
        mapping: &TimeMapping,
        event: &PointerEvent,
    ) -> GanttResult<SessionUpdate> {
        let bar = chart.try_bar(&self.bar)?;
        let Some(container) = surface.container_left(&bar.row) else {
            return Ok(SessionUpdate::default());
        };
        let candidate = mapping.position_to_time(event.x - container, chart_width(&*surface)?)?;
        if candidate >= bar.end {
            return Ok(SessionUpdate::default());
        }
        let start = candidate.min(bar.end - config.minimum_gap_delta());

        let bar = chart.try_bar_mut(&self.bar)?;
        if start == bar.start {
            return Ok(SessionUpdate::default());
        }
        bar.start = start;
        bar.refresh_gap();
        Ok(SessionUpdate {
            new_row: None,
            times_changed: true,
        })
    }

    fn drag_right_edge<S: ChartSurface + ?Sized>(
        &self,
        chart: &mut Chart,
        surface: &mut S,
        config: &ChartConfig,
        mapping: &TimeMapping,
        event: &PointerEvent,
    ) -> GanttResult<SessionUpdate> {
        let bar = chart.try_bar(&self.bar)?;
        let Some(container) = surface.container_left(&bar.row) else {
            return Ok(SessionUpdate::default());
        };
        let candidate = mapping.position_to_time(event.x - container, chart_width(&*surface)?)?;
        if candidate <= bar.start {
            return Ok(SessionUpdate::default());
        }
        let end = candidate.max(bar.start + config.minimum_gap_delta());

        let bar = chart.try_bar_mut(&self.bar)?;
        if end == bar.end {
            return Ok(SessionUpdate::default());
        }
        bar.end = end;
        bar.refresh_gap();
        Ok(SessionUpdate {
            new_row: None,
            times_changed: true,
        })
    }
}
