use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GanttError, GanttResult};

/// Stable identity of a bar across a drag transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BarId(String);

impl BarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BarId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identity of a horizontal track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Pixel bounds a bar may reach during the current drag, relative to its
/// row container. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragLimits {
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl DragLimits {
    /// True when `[x_start, x_end]` leaves the allowed band.
    pub fn excludes(&self, x_start: f64, x_end: f64) -> bool {
        if let Some(left) = self.left {
            if x_start < left {
                return true;
            }
        }
        matches!(self.right, Some(right) if x_end > right)
    }
}

/// A timed interval placed in exactly one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub id: BarId,
    pub label: Option<String>,
    pub row: RowId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Bars sharing a bundle id move together.
    pub bundle: Option<String>,
    /// Never moved by dragging or by overlap pushes.
    pub immobile: bool,
    /// Bar-level opt-out of being pushed when `Some(false)`.
    pub push_on_overlap: Option<bool>,
    /// Supports resizing from its edges.
    pub has_handles: bool,
    /// Exempt from overlap detection.
    pub enable_overlap: bool,
    pub drag_limits: DragLimits,
    /// Record fields the engine does not interpret.
    pub extra: serde_json::Map<String, serde_json::Value>,
    gap: TimeDelta,
}

impl Bar {
    pub fn new(
        id: impl Into<BarId>,
        row: impl Into<RowId>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> GanttResult<Self> {
        let id = id.into();
        if end < start {
            return Err(GanttError::InvalidBar {
                id,
                reason: format!("end {end} is before start {start}"),
            });
        }
        Ok(Self {
            id,
            label: None,
            row: row.into(),
            start,
            end,
            bundle: None,
            immobile: false,
            push_on_overlap: None,
            has_handles: false,
            enable_overlap: false,
            drag_limits: DragLimits::default(),
            extra: serde_json::Map::new(),
            gap: end - start,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = Some(bundle.into());
        self
    }

    pub fn immobile(mut self) -> Self {
        self.immobile = true;
        self
    }

    pub fn with_handles(mut self) -> Self {
        self.has_handles = true;
        self
    }

    pub fn with_push_on_overlap(mut self, enabled: bool) -> Self {
        self.push_on_overlap = Some(enabled);
        self
    }

    pub fn with_overlap_enabled(mut self) -> Self {
        self.enable_overlap = true;
        self
    }

    /// Duration kept when only the start moves.
    pub fn gap(&self) -> TimeDelta {
        self.gap
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Re-derive the cached gap after an edge changed.
    pub fn refresh_gap(&mut self) {
        self.gap = self.end - self.start;
    }

    /// Moves both endpoints, keeping the duration.
    pub fn shift(&mut self, delta: TimeDelta) {
        self.start += delta;
        self.end += delta;
    }

    /// Overlap pushes may never displace this bar.
    pub fn is_pinned(&self) -> bool {
        self.immobile || self.push_on_overlap == Some(false)
    }

    pub fn shares_bundle_with(&self, other: &Bar) -> bool {
        matches!((&self.bundle, &other.bundle), (Some(a), Some(b)) if a == b)
    }

    pub fn snapshot(&self) -> BarSnapshot {
        BarSnapshot {
            start: self.start,
            end: self.end,
            row: self.row.clone(),
        }
    }

    /// Puts times and row back to a recorded state.
    pub fn restore(&mut self, snapshot: &BarSnapshot) {
        self.start = snapshot.start;
        self.end = snapshot.end;
        self.row = snapshot.row.clone();
        self.refresh_gap();
    }
}

/// Pre-drag state of a bar, recorded on first touch within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSnapshot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub row: RowId,
}
