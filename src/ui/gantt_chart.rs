use chrono::TimeDelta;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use gantt_timeline::{
    Bar, BarEvent, BarEventKind, BarId, Chart, ChartSurface, DragManager, DragOutcome, DragTarget,
    GanttError, GeometryProvider, PixelSpan, PointerEvent, RowId, TimelineLayout,
};
use tracing::trace;

use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Chart state that outlives a frame.
#[derive(Debug, Default)]
pub struct ChartViewState {
    resize_cursor: bool,
}

/// What happened in the chart this frame.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    /// One line per bar notification, oldest first.
    pub notices: Vec<String>,
    pub outcome: Option<DragOutcome>,
    pub error: Option<GanttError>,
}

/// The painted chart as the drag engine sees it. Rows are re-laid out from
/// the model every frame, so reparenting needs no bookkeeping here.
struct EguiSurface<'a> {
    layout: TimelineLayout,
    state: &'a mut ChartViewState,
    notices: Vec<String>,
}

impl GeometryProvider for EguiSurface<'_> {
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

impl ChartSurface for EguiSurface<'_> {
    fn reparent(&mut self, bar: &BarId, from: &RowId, to: &RowId) {
        trace!(bar = %bar, from = %from, to = %to, "bar changed rows");
    }

    fn set_resize_cursor(&mut self, active: bool) {
        self.state.resize_cursor = active;
    }

    fn emit(&mut self, event: &BarEvent<'_>) {
        let name = bar_name(event.bar);
        let notice = match (event.kind, event.new_row, event.moved_bars) {
            (BarEventKind::DragStart, _, _) => format!("Dragging '{name}'"),
            (BarEventKind::Drag, Some(row), _) => format!("'{name}' moved to row {row}"),
            (BarEventKind::Drag, None, _) => return,
            (BarEventKind::DragEnd, _, Some(moved)) => {
                format!("Dropped '{name}' ({} bars touched)", moved.len())
            }
            (BarEventKind::DragEnd, _, None) => format!("Dropped '{name}'"),
        };
        self.notices.push(notice);
    }
}

fn bar_name(bar: &Bar) -> &str {
    bar.label.as_deref().unwrap_or(bar.id.as_str())
}

fn pointer_event(pos: Pos2, target: DragTarget) -> PointerEvent {
    PointerEvent::new(pos.x as f64, pos.y as f64).on(target)
}

/// Render the chart and route pointer input into `manager`.
pub fn show_gantt_chart(
    chart: &mut Chart,
    manager: &mut DragManager,
    state: &mut ChartViewState,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let chart_height = HEADER_HEIGHT + chart.rows().len() as f32 * ROW_HEIGHT;

    let (response, painter) = ui.allocate_painter(
        Vec2::new(available.x, chart_height.max(available.y)),
        Sense::hover(),
    );
    let origin = response.rect.min;
    let track_left = origin.x + theme::LABEL_WIDTH;
    let track_width = (response.rect.width() - theme::LABEL_WIDTH).max(0.0);

    let row_ids: Vec<RowId> = chart.rows().iter().map(|r| r.id.clone()).collect();
    let layout = TimelineLayout::new(
        manager.mapping().clone(),
        row_ids,
        track_width as f64,
        ROW_HEIGHT as f64,
    )
    .with_origin(track_left as f64, (origin.y + HEADER_HEIGHT) as f64);

    // Hit-test bars against last frame's positions.
    let mut pressed: Option<(BarId, PointerEvent)> = None;
    let press_origin = ui.input(|i| i.pointer.press_origin());
    for bar in chart.bars() {
        let Some(bar_rect) = bar_rect(&layout, bar) else {
            continue;
        };
        let body = ui.interact(
            bar_rect,
            ui.make_persistent_id(("bar", bar.id.as_str())),
            Sense::click_and_drag(),
        );
        let mut target = body.drag_started().then_some(DragTarget::Body);

        if bar.has_handles {
            let left = ui.interact(
                handle_rect(bar_rect, bar_rect.left()),
                ui.make_persistent_id(("bar-resize-left", bar.id.as_str())),
                Sense::drag(),
            );
            let right = ui.interact(
                handle_rect(bar_rect, bar_rect.right()),
                ui.make_persistent_id(("bar-resize-right", bar.id.as_str())),
                Sense::drag(),
            );
            if left.hovered() || right.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            }
            if left.drag_started() {
                target = Some(DragTarget::LeftHandle);
            } else if right.drag_started() {
                target = Some(DragTarget::RightHandle);
            }
        }

        if body.hovered() && !manager.is_dragging() {
            show_bar_tooltip(ui, manager, bar);
        }
        if let (Some(target), None) = (target, &pressed) {
            let at = press_origin
                .or_else(|| body.interact_pointer_pos())
                .unwrap_or(bar_rect.center());
            pressed = Some((bar.id.clone(), pointer_event(at, target)));
        }
    }

    let mut surface = EguiSurface {
        layout,
        state,
        notices: Vec::new(),
    };
    if let Err(err) = drive_drag(chart, manager, &mut surface, pressed, ui, &mut interaction) {
        interaction.error = Some(err);
    }
    if surface.state.resize_cursor {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
    } else if manager.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    }

    painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
    draw_rows(&painter, &surface.layout, chart, origin);
    draw_header(&painter, &surface.layout, origin, response.rect.width());
    for (row_index, row) in chart.rows().iter().enumerate() {
        for bar in chart.bars_in_row(&row.id) {
            let dragged = manager.dragged_bar() == Some(&bar.id);
            draw_bar(&painter, &surface.layout, bar, theme::bar_color(row_index), dragged);
        }
    }

    interaction.notices = surface.notices;
    interaction
}

fn drive_drag(
    chart: &mut Chart,
    manager: &mut DragManager,
    surface: &mut EguiSurface<'_>,
    pressed: Option<(BarId, PointerEvent)>,
    ui: &Ui,
    interaction: &mut ChartInteraction,
) -> Result<(), GanttError> {
    if let Some((bar_id, event)) = pressed {
        if !manager.is_dragging() {
            let bundled = chart.bar(&bar_id).is_some_and(|b| b.bundle.is_some());
            if bundled && event.target == DragTarget::Body {
                manager.begin_bundle_drag(chart, surface, &bar_id, event)?;
            } else {
                manager.begin_bar_drag(chart, surface, &bar_id, event)?;
            }
        }
    }
    if !manager.is_dragging() {
        return Ok(());
    }

    let (latest, released) = ui.input(|i| (i.pointer.latest_pos(), i.pointer.primary_released()));
    if let Some(pos) = latest {
        let moved = manager.pointer_move(chart, surface, pointer_event(pos, DragTarget::Body));
        // A failed move must not keep the release from ending the drag.
        if let Err(err) = moved {
            if !released {
                return Err(err);
            }
            interaction.error = Some(err);
        }
    }
    if released {
        let pos = latest.unwrap_or_default();
        interaction.outcome = manager.pointer_up(chart, surface, pointer_event(pos, DragTarget::Body))?;
    }
    Ok(())
}

fn bar_rect(layout: &TimelineLayout, bar: &Bar) -> Option<Rect> {
    let span = layout.bar_span(bar)?;
    let top = layout.row_top(&bar.row)? as f32;
    let left = layout.origin_x as f32 + span.left as f32;
    let inset = theme::BAR_INSET;
    Some(Rect::from_min_size(
        Pos2::new(left, top + inset),
        Vec2::new((span.width as f32).max(4.0), ROW_HEIGHT - inset * 2.0),
    ))
}

fn handle_rect(bar_rect: Rect, x: f32) -> Rect {
    Rect::from_min_max(
        Pos2::new(x - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(x + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    )
}

fn show_bar_tooltip(ui: &Ui, manager: &DragManager, bar: &Bar) {
    let format = manager.mapping().format();
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new(("bar-tip", bar.id.as_str())),
        |ui| {
            ui.strong(bar_name(bar));
            ui.label(format!("{} → {}", format.format(bar.start), format.format(bar.end)));
            if let Some(bundle) = &bar.bundle {
                ui.label(format!("Bundle: {bundle}"));
            }
            if bar.immobile {
                ui.label("Immobile");
            }
        },
    );
}

fn draw_rows(painter: &egui::Painter, layout: &TimelineLayout, chart: &Chart, origin: Pos2) {
    let full_width = layout.origin_x as f32 + layout.width as f32 - origin.x;
    for (i, row) in chart.rows().iter().enumerate() {
        let Some(top) = layout.row_top(&row.id) else {
            continue;
        };
        let y = top as f32;
        let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(full_width, ROW_HEIGHT)),
            0.0,
            row_bg,
        );
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(theme::LABEL_WIDTH, ROW_HEIGHT)),
            0.0,
            theme::BG_LABELS,
        );
        painter.text(
            Pos2::new(origin.x + 10.0, y + ROW_HEIGHT / 2.0),
            egui::Align2::LEFT_CENTER,
            &row.label,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
        painter.line_segment(
            [
                Pos2::new(origin.x, y + ROW_HEIGHT),
                Pos2::new(origin.x + full_width, y + ROW_HEIGHT),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_header(painter: &egui::Painter, layout: &TimelineLayout, origin: Pos2, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let mapping = layout.mapping();
    painter.text(
        Pos2::new(origin.x + 10.0, origin.y + 12.0),
        egui::Align2::LEFT_CENTER,
        mapping.chart_start().format("%a %d %b %Y").to_string(),
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );

    let bottom = layout.origin_y as f32 + layout.total_height() as f32;
    let mut tick = mapping.chart_start();
    while tick <= mapping.chart_end() {
        let x = layout.origin_x as f32 + mapping.time_to_position(tick, layout.width) as f32;
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.text(
            Pos2::new(x + 3.0, origin.y + 30.0),
            egui::Align2::LEFT_CENTER,
            tick.format("%H:%M").to_string(),
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
        tick += TimeDelta::hours(1);
    }
}

fn draw_bar(painter: &egui::Painter, layout: &TimelineLayout, bar: &Bar, color: Color32, dragged: bool) {
    let Some(bar_rect) = bar_rect(layout, bar) else {
        return;
    };
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    let fill = if bar.immobile { theme::IMMOBILE_FILL } else { color };
    painter.rect_filled(bar_rect, rounding, fill);

    if bar.immobile {
        let hatched = painter.with_clip_rect(bar_rect);
        let mut x = bar_rect.left() - bar_rect.height();
        while x < bar_rect.right() {
            hatched.line_segment(
                [
                    Pos2::new(x, bar_rect.bottom()),
                    Pos2::new(x + bar_rect.height(), bar_rect.top()),
                ],
                Stroke::new(1.5, theme::HATCH),
            );
            x += theme::HATCH_SPACING;
        }
    }
    if bar.bundle.is_some() {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.5, theme::BUNDLE_OUTLINE));
    }
    if dragged {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar.has_handles {
        let handle_h = bar_rect.height() * 0.55;
        let handle_y = bar_rect.center().y - handle_h / 2.0;
        for x in [bar_rect.left() + 1.5, bar_rect.right() - 5.5] {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
                Rounding::same(2.0),
                theme::HANDLE_COLOR,
            );
        }
    }

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(bar_name(bar).to_owned(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(bar_rect.shrink(2.0))
            .galley(Pos2::new(bar_rect.left() + 8.0, text_y), galley, Color32::TRANSPARENT);
    }
}
