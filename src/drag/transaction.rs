use tracing::debug;

use super::limit::set_drag_limits;
use super::overlap::{find_overlap, fix_overlaps, MovedBars, OverlapScope};
use super::session::{chart_width, DragSession};
use crate::config::ChartConfig;
use crate::error::{GanttError, GanttResult};
use crate::model::{BarId, Chart, TimeMapping};
use crate::surface::{BarEvent, BarEventKind, ChartSurface, PointerEvent};

/// What a finished transaction did.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    /// The bar the gesture started on.
    pub bar: BarId,
    /// Pre-drag state of every bar the transaction touched.
    pub moved_bars: MovedBars,
    pub rolled_back: bool,
}

#[derive(Debug)]
struct DragTransaction {
    main: BarId,
    sessions: Vec<DragSession>,
    moved: MovedBars,
}

/// Runs drag transactions for one chart: at most one gesture at a time.
#[derive(Debug)]
pub struct DragManager {
    config: ChartConfig,
    mapping: TimeMapping,
    active: Option<DragTransaction>,
}

impl DragManager {
    pub fn new(config: ChartConfig) -> GanttResult<Self> {
        let mapping = TimeMapping::from_config(&config)?;
        Ok(Self {
            config,
            mapping,
            active: None,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn mapping(&self) -> &TimeMapping {
        &self.mapping
    }

    pub fn set_push_on_overlap(&mut self, enabled: bool) {
        self.config.push_on_overlap = enabled;
    }

    pub fn set_no_overlap(&mut self, enabled: bool) {
        self.config.no_overlap = enabled;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Bar the active gesture started on.
    pub fn dragged_bar(&self) -> Option<&BarId> {
        self.active.as_ref().map(|t| &t.main)
    }

    /// Starts a transaction moving `bar_id` alone.
    ///
    /// Returns `false` when the bar is immobile and nothing started.
    pub fn begin_bar_drag<S: ChartSurface + ?Sized>(
        &mut self,
        chart: &mut Chart,
        surface: &mut S,
        bar_id: &BarId,
        event: PointerEvent,
    ) -> GanttResult<bool> {
        self.begin(chart, surface, bar_id, event, false)
    }

    /// Starts a transaction moving `bar_id` together with every mobile
    /// member of its bundle that sits in the same row. Falls back to a
    /// single-bar drag when the bar has no bundle.
    pub fn begin_bundle_drag<S: ChartSurface + ?Sized>(
        &mut self,
        chart: &mut Chart,
        surface: &mut S,
        bar_id: &BarId,
        event: PointerEvent,
    ) -> GanttResult<bool> {
        self.begin(chart, surface, bar_id, event, true)
    }

    fn begin<S: ChartSurface + ?Sized>(
        &mut self,
        chart: &mut Chart,
        surface: &mut S,
        bar_id: &BarId,
        event: PointerEvent,
        with_bundle: bool,
    ) -> GanttResult<bool> {
        if self.active.is_some() {
            return Err(GanttError::DragInProgress);
        }
        chart_width(&*surface)?;

        let main = chart.try_bar(bar_id)?;
        if main.immobile {
            debug!(bar = %bar_id, "immobile bar ignores drag");
            return Ok(false);
        }
        let mut members = vec![bar_id.clone()];
        if let (true, Some(bundle)) = (with_bundle, main.bundle.as_deref()) {
            let row = main.row.clone();
            members.extend(chart.bundle_members(bundle).into_iter().filter(|id| {
                id != bar_id && chart.bar(id).is_some_and(|b| b.row == row && !b.immobile)
            }));
        }

        chart.reset_drag_limits();
        set_drag_limits(chart, &*surface, bar_id, &self.config)?;

        let mut transaction = DragTransaction {
            main: bar_id.clone(),
            sessions: Vec::with_capacity(members.len()),
            moved: MovedBars::new(),
        };
        for member in &members {
            let session = DragSession::start(chart, surface, member, &event, member == bar_id)?;
            let bar = chart.try_bar(member)?;
            transaction.moved.record(bar);
            transaction.sessions.push(session);
        }
        surface.emit(&BarEvent {
            kind: BarEventKind::DragStart,
            pointer: event,
            bar: chart.try_bar(bar_id)?,
            new_row: None,
            moved_bars: None,
        });
        debug!(bar = %bar_id, sessions = members.len(), "drag started");

        self.active = Some(transaction);
        Ok(true)
    }

    /// Feeds a pointer move to every open session, then pushes whatever the
    /// moved bars now overlap. Does nothing while idle.
    pub fn pointer_move<S: ChartSurface + ?Sized>(
        &mut self,
        chart: &mut Chart,
        surface: &mut S,
        event: PointerEvent,
    ) -> GanttResult<()> {
        let Self {
            config,
            mapping,
            active,
        } = self;
        let Some(transaction) = active.as_mut() else {
            return Ok(());
        };

        for session in &transaction.sessions {
            let update = session.update(chart, surface, config, mapping, &event)?;
            if update.is_empty() {
                continue;
            }
            let bar = chart.try_bar(session.bar())?;
            surface.emit(&BarEvent {
                kind: BarEventKind::Drag,
                pointer: event,
                bar,
                new_row: update.new_row.as_ref(),
                moved_bars: None,
            });

            if config.push_on_overlap && bar.push_on_overlap != Some(false) {
                match fix_overlaps(chart, session.bar(), &mut transaction.moved) {
                    Ok(_) | Err(GanttError::InvariantViolation { .. }) => {}
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(())
    }

    /// Ends the active transaction. With overlaps forbidden and pushing off,
    /// any overlap among the touched bars restores all of them.
    ///
    /// Returns `None` while idle.
    pub fn pointer_up<S: ChartSurface + ?Sized>(
        &mut self,
        chart: &mut Chart,
        surface: &mut S,
        event: PointerEvent,
    ) -> GanttResult<Option<DragOutcome>> {
        let Some(transaction) = self.active.take() else {
            return Ok(None);
        };
        for session in &transaction.sessions {
            session.finish(surface);
        }

        let rolled_back = self.config.rollback_on_overlap()
            && transaction
                .moved
                .ids()
                .any(|id| find_overlap(chart, id, OverlapScope::All).is_some());
        if rolled_back {
            for (id, snapshot) in transaction.moved.iter() {
                let bar = chart.try_bar_mut(id)?;
                if bar.row != snapshot.row {
                    surface.reparent(id, &bar.row, &snapshot.row);
                }
                bar.restore(snapshot);
            }
            debug!(bar = %transaction.main, bars = transaction.moved.len(), "overlap left by drag, rolled back");
        }
        chart.reset_drag_limits();

        for session in transaction.sessions.iter().filter(|s| s.ends_transaction()) {
            let bar = chart.try_bar(session.bar())?;
            surface.emit(&BarEvent {
                kind: BarEventKind::DragEnd,
                pointer: event,
                bar,
                new_row: None,
                moved_bars: Some(&transaction.moved),
            });
        }
        debug!(bar = %transaction.main, moved = transaction.moved.len(), rolled_back, "drag ended");

        Ok(Some(DragOutcome {
            bar: transaction.main,
            moved_bars: transaction.moved,
            rolled_back,
        }))
    }

    /// Pushes apart anything `bar_id` overlaps outside of a gesture.
    pub fn resolve_overlaps(&self, chart: &mut Chart, bar_id: &BarId) -> GanttResult<usize> {
        let mut moved = MovedBars::new();
        fix_overlaps(chart, bar_id, &mut moved)
    }
}
