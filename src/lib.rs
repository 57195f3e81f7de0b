//! Drag and overlap-resolution engine for Gantt chart bars.
//!
//! Bars live in rows and carry start/end times. A [`DragManager`] turns
//! pointer gestures into time changes through a [`ChartSurface`] that
//! answers geometry queries, pushes bars out of the way when
//! `pushOnOverlap` is set, and rolls a gesture back when it leaves an
//! overlap that `noOverlap` forbids.

pub mod config;
pub mod drag;
pub mod error;
pub mod layout;
pub mod model;
pub mod surface;
pub mod telemetry;

pub use config::{BarFields, ChartConfig};
pub use drag::{DragManager, DragMode, DragOutcome, MovedBars, OverlapKind};
pub use error::{GanttError, GanttResult};
pub use layout::TimelineLayout;
pub use model::{
    Bar, BarId, BarSnapshot, Chart, DragLimits, Row, RowId, RowRecord, TimeFormat, TimeMapping,
    TimeRef, TimeUnit,
};
pub use surface::{
    BarEvent, BarEventKind, ChartSurface, DragTarget, GeometryProvider, PixelSpan, PointerEvent,
};
