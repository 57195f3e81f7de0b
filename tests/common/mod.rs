#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use gantt_timeline::{
    Bar, BarEvent, BarEventKind, BarId, Chart, ChartConfig, ChartSurface, DragManager, DragOutcome,
    GeometryProvider, PixelSpan, PointerEvent, Row, RowId, TimelineLayout,
};

pub const ROW_HEIGHT: f64 = 40.0;

/// A notification as the surface saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub kind: BarEventKind,
    pub bar: BarId,
    pub new_row: Option<RowId>,
    pub moved: Option<usize>,
}

/// Row-stack surface, 600px wide for a 600 minute chart, that records
/// everything the engine asks of it.
pub struct RecordingSurface {
    pub layout: TimelineLayout,
    pub events: Vec<Recorded>,
    pub reparents: Vec<(BarId, RowId, RowId)>,
    pub resize_cursor: bool,
}

impl GeometryProvider for RecordingSurface {
    fn chart_width(&self) -> Option<f64> {
        self.layout.chart_width()
    }

    fn bar_span(&self, bar: &Bar) -> Option<PixelSpan> {
        self.layout.bar_span(bar)
    }

    fn container_left(&self, row: &RowId) -> Option<f64> {
        self.layout.container_left(row)
    }

    fn row_at(&self, x: f64, y: f64) -> Option<RowId> {
        self.layout.row_at(x, y)
    }
}

impl ChartSurface for RecordingSurface {
    fn reparent(&mut self, bar: &BarId, from: &RowId, to: &RowId) {
        self.reparents.push((bar.clone(), from.clone(), to.clone()));
    }

    fn set_resize_cursor(&mut self, active: bool) {
        self.resize_cursor = active;
    }

    fn emit(&mut self, event: &BarEvent<'_>) {
        self.events.push(Recorded {
            kind: event.kind,
            bar: event.bar.id.clone(),
            new_row: event.new_row.cloned(),
            moved: event.moved_bars.map(|m| m.len()),
        });
    }
}

/// Chart minute `m` of the default 08:00-18:00 chart.
pub fn minute(m: i64) -> NaiveDateTime {
    chart_start() + TimeDelta::minutes(m)
}

/// Wall-clock time on the default chart day.
pub fn at(h: i64, m: i64) -> NaiveDateTime {
    chart_start() + TimeDelta::minutes((h - 8) * 60 + m)
}

fn chart_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("chart start")
}

pub fn bar(id: &str, row: &str, from: NaiveDateTime, to: NaiveDateTime) -> Bar {
    Bar::new(id, row, from, to).expect("valid bar")
}

pub struct Fixture {
    pub manager: DragManager,
    pub chart: Chart,
    pub surface: RecordingSurface,
}

impl Fixture {
    pub fn new(config: ChartConfig, rows: &[&str], bars: Vec<Bar>) -> Self {
        let manager = DragManager::new(config).expect("manager");
        let mut chart = Chart::new();
        for row in rows {
            chart.add_row(Row::new(*row, row.to_uppercase()));
        }
        for bar in bars {
            chart.add_bar(bar).expect("add bar");
        }
        let layout = TimelineLayout::new(
            manager.mapping().clone(),
            rows.iter().map(|r| RowId::new(*r)).collect(),
            600.0,
            ROW_HEIGHT,
        );
        Self {
            manager,
            chart,
            surface: RecordingSurface {
                layout,
                events: Vec::new(),
                reparents: Vec::new(),
                resize_cursor: false,
            },
        }
    }

    pub fn press(&mut self, id: &str, event: PointerEvent) -> bool {
        self.manager
            .begin_bar_drag(&mut self.chart, &mut self.surface, &BarId::new(id), event)
            .expect("begin bar drag")
    }

    pub fn press_bundle(&mut self, id: &str, event: PointerEvent) -> bool {
        self.manager
            .begin_bundle_drag(&mut self.chart, &mut self.surface, &BarId::new(id), event)
            .expect("begin bundle drag")
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.manager
            .pointer_move(&mut self.chart, &mut self.surface, PointerEvent::new(x, y))
            .expect("pointer move");
    }

    pub fn release(&mut self, x: f64, y: f64) -> DragOutcome {
        self.manager
            .pointer_up(&mut self.chart, &mut self.surface, PointerEvent::new(x, y))
            .expect("pointer up")
            .expect("active drag")
    }

    pub fn bar(&self, id: &str) -> &Bar {
        self.chart.bar(&BarId::new(id)).expect("known bar")
    }

    pub fn times(&self, id: &str) -> (NaiveDateTime, NaiveDateTime) {
        let bar = self.bar(id);
        (bar.start, bar.end)
    }

    /// Surface y at the middle of the `index`th row.
    pub fn row_y(index: usize) -> f64 {
        index as f64 * ROW_HEIGHT + ROW_HEIGHT / 2.0
    }
}
