//! Pointer-driven editing of bar times: sessions that follow the pointer,
//! precomputed drag limits, overlap pushing and the transaction that ties
//! them together and can roll them back.

pub mod limit;
pub mod overlap;
pub mod session;
pub mod transaction;

pub use limit::{set_drag_limits, Side};
pub use overlap::{classify, find_overlap, fix_overlaps, MovedBars, OverlapKind, OverlapScope};
pub use session::{DragMode, DragSession, SessionUpdate};
pub use transaction::{DragManager, DragOutcome};
