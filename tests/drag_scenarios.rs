mod common;

use common::{at, bar, Fixture};
use gantt_timeline::{BarEventKind, BarId, ChartConfig, DragLimits, DragTarget, PointerEvent, RowId};

fn pushing() -> ChartConfig {
    ChartConfig::default().with_push_on_overlap(true)
}

fn forbidding() -> ChartConfig {
    ChartConfig::default().with_no_overlap(true)
}

fn kinds(fx: &Fixture) -> Vec<BarEventKind> {
    fx.surface.events.iter().map(|e| e.kind).collect()
}

#[test]
fn immobile_neighbour_stops_a_drag_at_its_edge() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        pushing(),
        &["r1"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)),
            bar("wall", "r1", at(10, 0), at(11, 0)).immobile(),
        ],
    );

    assert!(fx.press("x", PointerEvent::new(70.0, y)));
    assert_eq!(
        fx.bar("x").drag_limits,
        DragLimits {
            left: None,
            right: Some(120.0)
        }
    );

    fx.move_to(100.0, y);
    assert_eq!(fx.times("x"), (at(9, 0), at(10, 0)));

    fx.move_to(40.0, y);
    assert_eq!(fx.times("x"), (at(8, 30), at(9, 30)));

    fx.move_to(100.0, y);
    assert_eq!(fx.times("x"), (at(8, 30), at(9, 30)));

    fx.release(100.0, y);
    assert!(fx.bar("x").end <= fx.bar("wall").start);
    assert_eq!(fx.times("wall"), (at(10, 0), at(11, 0)));
    assert_eq!(fx.bar("x").drag_limits, DragLimits::default());
}

#[test]
fn dragged_bar_pushes_the_bar_it_lands_on() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        pushing(),
        &["r1"],
        vec![
            bar("x", "r1", at(8, 0), at(9, 0)),
            bar("z", "r1", at(9, 30), at(10, 30)),
        ],
    );

    fx.press("x", PointerEvent::new(10.0, y));
    fx.move_to(70.0, y);

    assert_eq!(fx.times("x"), (at(9, 0), at(10, 0)));
    assert_eq!(fx.times("z"), (at(10, 0), at(11, 0)));

    let outcome = fx.release(70.0, y);
    assert!(!outcome.rolled_back);
    assert_eq!(outcome.bar, BarId::new("x"));
    assert_eq!(
        outcome.moved_bars.get(&BarId::new("z")).map(|s| (s.start, s.end)),
        Some((at(9, 30), at(10, 30)))
    );
    assert_eq!(outcome.moved_bars.len(), 2);
}

#[test]
fn bundle_members_in_the_row_move_in_lockstep() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        ChartConfig::default(),
        &["r1", "r2"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)).with_bundle("B1"),
            bar("w", "r1", at(11, 0), at(11, 30)).with_bundle("B1"),
            bar("v", "r1", at(12, 0), at(13, 0)),
            bar("u", "r2", at(9, 0), at(10, 0)).with_bundle("B1"),
        ],
    );

    assert!(fx.press_bundle("x", PointerEvent::new(70.0, y)));
    fx.move_to(100.0, y);

    assert_eq!(fx.times("x"), (at(9, 30), at(10, 30)));
    assert_eq!(fx.times("w"), (at(11, 30), at(12, 0)));
    assert_eq!(fx.times("v"), (at(12, 0), at(13, 0)));
    assert_eq!(fx.times("u"), (at(9, 0), at(10, 0)));

    let outcome = fx.release(100.0, y);
    assert_eq!(outcome.moved_bars.len(), 2);
    let ends = fx
        .surface
        .events
        .iter()
        .filter(|e| e.kind == BarEventKind::DragEnd)
        .count();
    assert_eq!(ends, 1);
    let starts: Vec<&BarId> = fx
        .surface
        .events
        .iter()
        .filter(|e| e.kind == BarEventKind::DragStart)
        .map(|e| &e.bar)
        .collect();
    assert_eq!(starts, vec![&BarId::new("x")]);
    assert_eq!(kinds(&fx)[0], BarEventKind::DragStart);
}

#[test]
fn bundle_drag_without_bundle_is_a_bar_drag() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        ChartConfig::default(),
        &["r1"],
        vec![bar("x", "r1", at(9, 0), at(10, 0))],
    );

    assert!(fx.press_bundle("x", PointerEvent::new(70.0, y)));
    fx.move_to(80.0, y);
    fx.release(80.0, y);

    assert_eq!(fx.times("x"), (at(9, 10), at(10, 10)));
    assert_eq!(
        kinds(&fx),
        vec![BarEventKind::DragStart, BarEventKind::Drag, BarEventKind::DragEnd]
    );
}

#[test]
fn overlap_left_by_a_drag_is_rolled_back() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        forbidding(),
        &["r1"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)),
            bar("y", "r1", at(10, 30), at(11, 30)),
        ],
    );

    fx.press("x", PointerEvent::new(70.0, y));
    fx.move_to(130.0, y);
    assert_eq!(fx.times("x"), (at(10, 0), at(11, 0)));

    let outcome = fx.release(130.0, y);
    assert!(outcome.rolled_back);
    assert_eq!(fx.times("x"), (at(9, 0), at(10, 0)));
    assert_eq!(fx.times("y"), (at(10, 30), at(11, 30)));

    let end = fx.surface.events.last().expect("drag end");
    assert_eq!(end.kind, BarEventKind::DragEnd);
    assert_eq!(end.moved, Some(1));
}

#[test]
fn rollback_also_undoes_a_row_change() {
    let mut fx = Fixture::new(
        forbidding(),
        &["r1", "r2"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)),
            bar("y", "r2", at(9, 0), at(10, 0)),
        ],
    );

    fx.press("x", PointerEvent::new(70.0, Fixture::row_y(0)));
    fx.move_to(70.0, Fixture::row_y(1));
    assert_eq!(fx.bar("x").row, RowId::new("r2"));
    let moved = fx
        .surface
        .events
        .iter()
        .find(|e| e.kind == BarEventKind::Drag)
        .expect("drag event");
    assert_eq!(moved.new_row, Some(RowId::new("r2")));

    let outcome = fx.release(70.0, Fixture::row_y(1));
    assert!(outcome.rolled_back);
    assert_eq!(fx.bar("x").row, RowId::new("r1"));
    assert_eq!(
        fx.surface.reparents,
        vec![
            (BarId::new("x"), RowId::new("r1"), RowId::new("r2")),
            (BarId::new("x"), RowId::new("r2"), RowId::new("r1")),
        ]
    );
}

#[test]
fn clean_drop_is_kept_when_overlaps_are_forbidden() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        forbidding(),
        &["r1", "r2"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)),
            bar("y", "r1", at(10, 30), at(11, 30)),
        ],
    );

    fx.press("x", PointerEvent::new(70.0, y));
    fx.move_to(70.0, Fixture::row_y(1));
    fx.move_to(160.0, Fixture::row_y(1));
    let outcome = fx.release(160.0, Fixture::row_y(1));

    assert!(!outcome.rolled_back);
    assert_eq!(fx.bar("x").row, RowId::new("r2"));
    assert_eq!(fx.times("x"), (at(10, 30), at(11, 30)));
}

#[test]
fn pushing_disables_rollback() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        pushing().with_no_overlap(true),
        &["r1"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)),
            bar("z", "r1", at(10, 0), at(11, 0)),
        ],
    );

    fx.press("x", PointerEvent::new(70.0, y));
    fx.move_to(100.0, y);
    let outcome = fx.release(100.0, y);

    assert!(!outcome.rolled_back);
    assert_eq!(fx.times("z"), (at(10, 30), at(11, 30)));
}

#[test]
fn push_chain_stops_short_of_an_immobile_bar() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        pushing(),
        &["r1"],
        vec![
            bar("x", "r1", at(8, 0), at(9, 0)),
            bar("z", "r1", at(9, 30), at(10, 30)),
            bar("wall", "r1", at(11, 0), at(12, 0)).immobile(),
        ],
    );

    fx.press("x", PointerEvent::new(10.0, y));
    assert_eq!(fx.bar("x").drag_limits.right, Some(120.0));

    fx.move_to(70.0, y);
    assert_eq!(fx.times("x"), (at(9, 0), at(10, 0)));
    assert_eq!(fx.times("z"), (at(10, 0), at(11, 0)));

    fx.move_to(80.0, y);
    fx.release(80.0, y);
    assert_eq!(fx.times("z"), (at(10, 0), at(11, 0)));
    assert!(fx.bar("z").end <= fx.bar("wall").start);
}

#[test]
fn pushed_bundle_partner_follows_in_its_own_row() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        pushing(),
        &["r1", "r2"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)),
            bar("y", "r1", at(10, 15), at(11, 0)).with_bundle("B"),
            bar("w", "r2", at(12, 0), at(13, 0)).with_bundle("B"),
        ],
    );

    fx.press("x", PointerEvent::new(70.0, y));
    fx.move_to(100.0, y);
    let outcome = fx.release(100.0, y);

    assert_eq!(fx.times("y"), (at(10, 30), at(11, 15)));
    assert_eq!(fx.times("w"), (at(12, 15), at(13, 15)));
    assert_eq!(outcome.moved_bars.len(), 3);
}

#[test]
fn left_handle_resize_respects_minimum_gap() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        ChartConfig::default().with_minimum_gap(20.0),
        &["r1"],
        vec![bar("x", "r1", at(9, 0), at(10, 0)).with_handles()],
    );

    fx.press("x", PointerEvent::new(60.0, y).on(DragTarget::LeftHandle));
    assert!(fx.surface.resize_cursor);

    fx.move_to(110.0, y);
    assert_eq!(fx.times("x"), (at(9, 40), at(10, 0)));

    fx.release(110.0, y);
    assert!(!fx.surface.resize_cursor);
    assert_eq!(fx.bar("x").gap(), chrono::TimeDelta::minutes(20));
}

#[test]
fn resizing_into_a_neighbour_pushes_it() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        pushing(),
        &["r1"],
        vec![
            bar("x", "r1", at(9, 0), at(10, 0)).with_handles(),
            bar("z", "r1", at(10, 0), at(11, 0)),
        ],
    );

    fx.press("x", PointerEvent::new(120.0, y).on(DragTarget::RightHandle));
    fx.move_to(150.0, y);
    fx.release(150.0, y);

    assert_eq!(fx.times("x"), (at(9, 0), at(10, 30)));
    assert_eq!(fx.times("z"), (at(10, 30), at(11, 30)));
}

#[test]
fn immobile_bars_cannot_be_dragged() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        ChartConfig::default(),
        &["r1"],
        vec![bar("wall", "r1", at(9, 0), at(10, 0)).immobile()],
    );

    assert!(!fx.press("wall", PointerEvent::new(70.0, y)));
    fx.move_to(200.0, y);

    assert!(!fx.manager.is_dragging());
    assert_eq!(fx.times("wall"), (at(9, 0), at(10, 0)));
    assert!(fx.surface.events.is_empty());
}

#[test]
fn swallowed_bar_stops_the_push_but_not_the_drag() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        pushing(),
        &["r1"],
        vec![
            bar("x", "r1", at(8, 0), at(11, 0)),
            bar("s", "r1", at(12, 0), at(12, 30)),
        ],
    );

    fx.press("x", PointerEvent::new(10.0, y));
    fx.move_to(250.0, y);
    assert_eq!(fx.times("x"), (at(12, 0), at(15, 0)));
    assert_eq!(fx.times("s"), (at(12, 0), at(12, 30)));
    assert!(fx.manager.is_dragging());

    let outcome = fx.release(250.0, y);
    assert!(!outcome.rolled_back);
    assert_eq!(outcome.bar, BarId::new("x"));
    assert!(!fx.manager.is_dragging());
    assert_eq!(fx.times("x"), (at(12, 0), at(15, 0)));
    assert_eq!(fx.times("s"), (at(12, 0), at(12, 30)));
    assert_eq!(kinds(&fx).last(), Some(&BarEventKind::DragEnd));
}

#[test]
fn release_ends_the_drag_after_a_failed_move() {
    let y = Fixture::row_y(0);
    let mut fx = Fixture::new(
        ChartConfig::default(),
        &["r1"],
        vec![bar("x", "r1", at(9, 0), at(10, 0))],
    );

    assert!(fx.press("x", PointerEvent::new(70.0, y)));
    fx.surface.layout.set_width(0.0);
    let moved = fx
        .manager
        .pointer_move(&mut fx.chart, &mut fx.surface, PointerEvent::new(100.0, y));
    assert!(moved.is_err());
    assert!(fx.manager.is_dragging());

    let outcome = fx.release(100.0, y);
    assert!(!outcome.rolled_back);
    assert!(!fx.manager.is_dragging());
    assert_eq!(fx.times("x"), (at(9, 0), at(10, 0)));
    assert_eq!(kinds(&fx), vec![BarEventKind::DragStart, BarEventKind::DragEnd]);
}
