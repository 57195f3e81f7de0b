pub mod bar;
pub mod chart;
pub mod timeline;

pub use bar::{Bar, BarId, BarSnapshot, DragLimits, RowId};
pub use chart::{Chart, Row, RowRecord};
pub use timeline::{TimeFormat, TimeMapping, TimeRef, TimeUnit};
