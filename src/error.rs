use thiserror::Error;

use crate::model::{BarId, RowId};

pub type GanttResult<T> = Result<T, GanttError>;

#[derive(Debug, Error)]
pub enum GanttError {
    #[error("cannot parse time {value:?} with format {format:?}: {source}")]
    Parse {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    /// One bar swallows another during overlap resolution, so there is no
    /// meaningful push direction.
    #[error("bar {bar} lies inside bar {other}; overlap cannot be resolved by a push")]
    InvariantViolation { bar: BarId, other: BarId },

    #[error("invalid chart configuration: {0}")]
    Configuration(String),

    #[error("invalid bar {id}: {reason}")]
    InvalidBar { id: BarId, reason: String },

    #[error("unknown bar: {0}")]
    UnknownBar(BarId),

    #[error("unknown row: {0}")]
    UnknownRow(RowId),

    #[error("a drag transaction is already active")]
    DragInProgress,
}
