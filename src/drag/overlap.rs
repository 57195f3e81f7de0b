use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{trace, warn};

use crate::error::{GanttError, GanttResult};
use crate::model::{Bar, BarId, BarSnapshot, Chart};

/// Push budget per bar in the chart before a cascade is cut short.
const MAX_PUSHES_PER_BAR: usize = 16;

/// Pre-drag state of every bar a transaction touched, keyed by bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovedBars(HashMap<BarId, BarSnapshot>);

impl MovedBars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `bar` unless it was already touched. Returns true on first touch.
    pub fn record(&mut self, bar: &Bar) -> bool {
        if self.0.contains_key(&bar.id) {
            return false;
        }
        self.0.insert(bar.id.clone(), bar.snapshot());
        true
    }

    pub fn get(&self, id: &BarId) -> Option<&BarSnapshot> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &BarId) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BarId, &BarSnapshot)> {
        self.0.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BarId> {
        self.0.keys()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// How a moved bar overlaps another bar of its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// The moved bar starts inside the other bar.
    Left,
    /// The moved bar ends inside the other bar.
    Right,
    /// One bar lies within the other.
    Between,
}

/// Which bars count as obstacles when searching for an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapScope {
    /// Only bars a push may displace.
    Pushable,
    /// Every bar not exempt from overlap detection.
    All,
}

fn strictly_within(t: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start < t && t < end
}

fn within(t: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start <= t && t <= end
}

/// Classifies how `moved` overlaps `other`, if at all.
pub fn classify(moved: &Bar, other: &Bar) -> Option<OverlapKind> {
    if strictly_within(moved.start, other.start, other.end) {
        return Some(OverlapKind::Left);
    }
    if strictly_within(moved.end, other.start, other.end) {
        return Some(OverlapKind::Right);
    }
    let other_inside = strictly_within(other.start, moved.start, moved.end)
        || strictly_within(other.end, moved.start, moved.end);
    let moved_inside = within(moved.start, other.start, other.end)
        && within(moved.end, other.start, other.end);
    (other_inside || moved_inside).then_some(OverlapKind::Between)
}

/// First bar in `bar_id`'s row that it overlaps.
pub fn find_overlap(chart: &Chart, bar_id: &BarId, scope: OverlapScope) -> Option<(BarId, OverlapKind)> {
    let bar = chart.bar(bar_id)?;
    if bar.enable_overlap {
        return None;
    }
    chart
        .bars_in_row(&bar.row)
        .filter(|other| other.id != bar.id && !other.enable_overlap)
        .filter(|other| scope == OverlapScope::All || !other.is_pinned())
        .find_map(|other| classify(bar, other).map(|kind| (other.id.clone(), kind)))
}

/// Pushes every bar that `bar_id` now overlaps out of its way, cascading to
/// the pushed bars' bundles and further overlaps. Each displaced bar is
/// recorded in `moved` before it changes. Returns the number of pushes.
///
/// A [`OverlapKind::Between`] overlap aborts the cascade with
/// [`GanttError::InvariantViolation`]; pushes already made are kept.
pub fn fix_overlaps(chart: &mut Chart, bar_id: &BarId, moved: &mut MovedBars) -> GanttResult<usize> {
    let budget = MAX_PUSHES_PER_BAR * chart.bars().len().max(1);
    let mut pushes = 0;
    let mut pending = vec![bar_id.clone()];

    while let Some(mut current) = pending.pop() {
        while let Some((other_id, kind)) = find_overlap(chart, &current, OverlapScope::Pushable) {
            if pushes >= budget {
                warn!(bar = %current, pushes, "overlap cascade exceeded its push budget");
                return Ok(pushes);
            }

            let pusher = chart.try_bar(&current)?;
            let other = chart.try_bar(&other_id)?;
            let delta: TimeDelta = match kind {
                OverlapKind::Left => -(other.end - pusher.start),
                OverlapKind::Right => pusher.end - other.start,
                OverlapKind::Between => {
                    warn!(
                        bar = %current,
                        other = %other_id,
                        "one bar is inside the other while pushing on overlap"
                    );
                    return Err(GanttError::InvariantViolation {
                        bar: current,
                        other: other_id,
                    });
                }
            };

            moved.record(other);
            let bundle = other.bundle.clone();
            chart.try_bar_mut(&other_id)?.shift(delta);
            pushes += 1;
            trace!(
                pusher = %current,
                pushed = %other_id,
                minutes = delta.num_milliseconds() as f64 / 60_000.0,
                "pushed overlapped bar"
            );

            if let Some(bundle) = bundle {
                for member in chart.bundle_members(&bundle) {
                    if member == other_id {
                        continue;
                    }
                    let bar = chart.try_bar_mut(&member)?;
                    if bar.immobile {
                        continue;
                    }
                    moved.record(bar);
                    bar.shift(delta);
                    pending.push(member);
                }
            }

            current = other_id;
        }
    }

    Ok(pushes)
}
