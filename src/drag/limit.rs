use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::config::ChartConfig;
use crate::error::GanttResult;
use crate::model::{Bar, BarId, Chart, DragLimits};
use crate::surface::{GeometryProvider, PixelSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Result of walking a row from one bar towards one side.
#[derive(Debug, Default)]
struct Walk {
    /// Free pixels before the first pinned bar, `None` if the row is open.
    gap: Option<f64>,
    /// Bundled bars met on the way, with the gap accumulated up to them.
    bundled: Vec<(BarId, f64)>,
}

/// Nearest bar of the same row on `side`, measured by left offsets.
fn next_bar<'a, G: GeometryProvider + ?Sized>(
    chart: &'a Chart,
    geometry: &G,
    bar: &'a Bar,
    span: PixelSpan,
    side: Side,
) -> Option<(&'a Bar, PixelSpan)> {
    chart
        .bars_in_row(&bar.row)
        .filter(|other| other.id != bar.id && !other.enable_overlap)
        .filter_map(|other| geometry.bar_span(other).map(|s| (other, s)))
        .filter(|(_, s)| match side {
            Side::Left => s.left < span.left,
            Side::Right => s.left > span.left,
        })
        .min_by(|(_, a), (_, b)| {
            let da = (a.left - span.left).abs();
            let db = (b.left - span.left).abs();
            da.total_cmp(&db)
        })
}

fn walk<G: GeometryProvider + ?Sized>(
    chart: &Chart,
    geometry: &G,
    from: &BarId,
    seed: f64,
    side: Side,
) -> Walk {
    let mut walk = Walk::default();
    let Some(mut current) = chart.bar(from) else {
        return walk;
    };
    let Some(mut current_span) = geometry.bar_span(current) else {
        return walk;
    };
    if current.bundle.is_some() {
        walk.bundled.push((current.id.clone(), seed));
    }

    let mut gap = seed;
    while let Some((next, next_span)) = next_bar(chart, geometry, current, current_span, side) {
        gap += match side {
            Side::Left => current_span.left - next_span.right(),
            Side::Right => next_span.left - current_span.right(),
        };
        if next.is_pinned() {
            walk.gap = Some(gap);
            return walk;
        }
        if next.bundle.is_some() {
            walk.bundled.push((next.id.clone(), gap));
        }
        current = next;
        current_span = next_span;
    }
    walk
}

/// Smallest free gap on `side` across the bar and every bundle reachable
/// from bundled bars on its path.
fn gap_to_obstacle<G: GeometryProvider + ?Sized>(
    chart: &Chart,
    geometry: &G,
    bar_id: &BarId,
    side: Side,
) -> Option<f64> {
    let first = walk(chart, geometry, bar_id, 0.0, side);
    let mut total = first.gap;
    let mut visited: HashSet<BarId> = first.bundled.iter().map(|(id, _)| id.clone()).collect();
    let mut queue: VecDeque<(BarId, f64)> = first.bundled.into();

    while let Some((bundled_id, gap)) = queue.pop_front() {
        let Some(bundle) = chart.bar(&bundled_id).and_then(|b| b.bundle.clone()) else {
            continue;
        };
        for member in chart.bundle_members(&bundle) {
            if member == bundled_id {
                continue;
            }
            let found = walk(chart, geometry, &member, gap, side);
            if let Some(found_gap) = found.gap {
                total = Some(total.map_or(found_gap, |t| t.min(found_gap)));
            }
            for (id, gap) in found.bundled {
                if visited.insert(id.clone()) {
                    queue.push_back((id, gap));
                }
            }
        }
    }
    total
}

/// Computes how far `bar_id` may be dragged before its path (or its
/// bundle's) runs into a pinned bar, and stores the result on the bar and on
/// every member of its bundle.
///
/// Returns `None` without touching any bar when limits do not apply: pushing
/// is off globally, the bar opted out of pushing, or it has no rendered span.
pub fn set_drag_limits<G: GeometryProvider + ?Sized>(
    chart: &mut Chart,
    geometry: &G,
    bar_id: &BarId,
    config: &ChartConfig,
) -> GanttResult<Option<DragLimits>> {
    let bar = chart.try_bar(bar_id)?;
    if !config.push_on_overlap || bar.push_on_overlap == Some(false) {
        return Ok(None);
    }
    let Some(span) = geometry.bar_span(bar) else {
        return Ok(None);
    };
    let bundle = bar.bundle.clone();

    let limits = DragLimits {
        left: gap_to_obstacle(chart, geometry, bar_id, Side::Left).map(|gap| span.left - gap),
        right: gap_to_obstacle(chart, geometry, bar_id, Side::Right).map(|gap| span.right() + gap),
    };
    debug!(bar = %bar_id, left = ?limits.left, right = ?limits.right, "drag limits");

    chart.try_bar_mut(bar_id)?.drag_limits = limits;
    if let Some(bundle) = bundle {
        for member in chart.bundle_members(&bundle) {
            chart.try_bar_mut(&member)?.drag_limits = limits;
        }
    }
    Ok(Some(limits))
}
