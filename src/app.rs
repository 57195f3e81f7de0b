use gantt_timeline::{BarId, Chart, ChartConfig, DragManager, GanttResult, RowRecord};
use serde_json::json;
use tracing::{info, warn};

use crate::ui;
use crate::ui::gantt_chart::ChartViewState;

/// Main application state.
pub struct GanttApp {
    pub chart: Chart,
    pub manager: DragManager,
    pub view: ChartViewState,

    // Status message
    pub status_message: String,
}

impl GanttApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> GanttResult<Self> {
        let path = ChartConfig::settings_path();
        let config = if path.exists() {
            ChartConfig::load(&path).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable settings");
                ChartConfig::default()
            })
        } else {
            ChartConfig::default()
        };
        let manager = match DragManager::new(config) {
            Ok(manager) => manager,
            Err(e) => {
                warn!(error = %e, "settings rejected, using defaults");
                DragManager::new(ChartConfig::default())?
            }
        };

        let (chart, status_message) = match Self::sample_chart(&manager) {
            Ok(chart) => (chart, "Ready".to_string()),
            Err(e) => (Chart::new(), format!("Sample chart failed: {e}")),
        };

        Ok(Self {
            chart,
            manager,
            view: ChartViewState::default(),
            status_message,
        })
    }

    /// A small machine-shop schedule showing every bar flag.
    fn sample_chart(manager: &DragManager) -> GanttResult<Chart> {
        let records: Vec<RowRecord> = serde_json::from_value(json!([
            {
                "id": "lathe",
                "label": "Lathe",
                "bars": [
                    { "start": "2024-01-01 08:30", "end": "2024-01-01 10:00",
                      "ganttBarConfig": { "id": "shaft", "label": "Shaft", "hasHandles": true } },
                    { "start": "2024-01-01 10:15", "end": "2024-01-01 11:30",
                      "ganttBarConfig": { "id": "flange", "label": "Flange", "bundle": "order-17" } },
                    { "start": "2024-01-01 12:00", "end": "2024-01-01 13:00",
                      "ganttBarConfig": { "id": "lathe-service", "label": "Service", "immobile": true } },
                    { "start": "2024-01-01 14:00", "end": "2024-01-01 16:00",
                      "ganttBarConfig": { "id": "bushing", "label": "Bushing", "hasHandles": true } }
                ]
            },
            {
                "id": "mill",
                "label": "Mill",
                "bars": [
                    { "start": "2024-01-01 09:00", "end": "2024-01-01 10:30",
                      "ganttBarConfig": { "id": "bracket", "label": "Bracket", "bundle": "order-17" } },
                    { "start": "2024-01-01 11:00", "end": "2024-01-01 12:30",
                      "ganttBarConfig": { "id": "housing", "label": "Housing", "pushOnOverlap": false } },
                    { "start": "2024-01-01 13:30", "end": "2024-01-01 15:00",
                      "ganttBarConfig": { "id": "plate", "label": "Plate", "hasHandles": true } }
                ]
            },
            {
                "id": "press",
                "label": "Press",
                "bars": [
                    { "start": "2024-01-01 08:00", "end": "2024-01-01 09:30",
                      "ganttBarConfig": { "id": "stamp", "label": "Stamp", "hasHandles": true } },
                    { "start": "2024-01-01 10:00", "end": "2024-01-01 12:00",
                      "ganttBarConfig": { "id": "inspection", "label": "Inspection", "enableOverlap": true } }
                ]
            },
            { "id": "spare", "label": "Spare", "bars": [] }
        ]))
        .map_err(|e| gantt_timeline::GanttError::Configuration(e.to_string()))?;

        let config = manager.config();
        Chart::from_records(records, &config.fields(), manager.mapping().format())
    }

    pub fn reset_sample(&mut self) {
        if self.manager.is_dragging() {
            return;
        }
        match Self::sample_chart(&self.manager) {
            Ok(chart) => {
                self.chart = chart;
                self.status_message = "Sample chart restored".to_string();
            }
            Err(e) => self.status_message = format!("Sample chart failed: {e}"),
        }
    }

    /// Pushes apart every overlap currently on the chart.
    pub fn resolve_overlaps(&mut self) {
        let ids: Vec<BarId> = self.chart.bars().iter().map(|b| b.id.clone()).collect();
        let mut pushes = 0;
        for id in &ids {
            match self.manager.resolve_overlaps(&mut self.chart, id) {
                Ok(n) => pushes += n,
                Err(e) => {
                    self.status_message = format!("Could not resolve: {e}");
                    return;
                }
            }
        }
        self.status_message = format!("Resolved overlaps ({pushes} pushes)");
    }

    pub fn set_push_on_overlap(&mut self, enabled: bool) {
        self.manager.set_push_on_overlap(enabled);
        self.status_message = format!("Push on overlap {}", if enabled { "on" } else { "off" });
    }

    pub fn set_no_overlap(&mut self, enabled: bool) {
        self.manager.set_no_overlap(enabled);
        self.status_message = format!("Forbid overlaps {}", if enabled { "on" } else { "off" });
    }

    pub fn save_settings(&mut self) {
        let path = ChartConfig::settings_path();
        match self.manager.config().save(&path) {
            Ok(()) => {
                info!(path = %path.display(), "settings saved");
                self.status_message = "Settings saved".to_string();
            }
            Err(e) => self.status_message = format!("Error saving: {e}"),
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Bars: {} · Rows: {}",
                                self.chart.bars().len(),
                                self.chart.rows().len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Central panel: chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::gantt_chart::show_gantt_chart(
                &mut self.chart,
                &mut self.manager,
                &mut self.view,
                ui,
            );
            if let Some(notice) = interaction.notices.last() {
                self.status_message = notice.clone();
            }
            if let Some(outcome) = &interaction.outcome {
                if outcome.rolled_back {
                    self.status_message = format!("'{}' would overlap, drag undone", outcome.bar);
                }
            }
            if let Some(e) = interaction.error {
                warn!(error = %e, "drag failed");
                self.status_message = format!("Drag failed: {e}");
            }
        });

        if self.manager.is_dragging() {
            ctx.request_repaint();
        }
    }
}
