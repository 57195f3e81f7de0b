use crate::app::GanttApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  Chart  ").font(theme::font_menu()), |ui| {
            if ui.button("  Reset Sample").clicked() {
                app.reset_sample();
                ui.close_menu();
            }
            if ui.button("  Resolve Overlaps").clicked() {
                app.resolve_overlaps();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Options  ").font(theme::font_menu()), |ui| {
            let mut push = app.manager.config().push_on_overlap;
            if ui.checkbox(&mut push, "Push on overlap").changed() {
                app.set_push_on_overlap(push);
            }
            let mut no_overlap = app.manager.config().no_overlap;
            if ui.checkbox(&mut no_overlap, "Forbid overlaps").changed() {
                app.set_no_overlap(no_overlap);
            }
            ui.separator();
            if ui.button("  Save Settings").clicked() {
                app.save_settings();
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let config = app.manager.config();
            let mode = match (config.push_on_overlap, config.no_overlap) {
                (true, _) => "pushing",
                (false, true) => "overlaps roll back",
                (false, false) => "overlaps allowed",
            };
            ui.label(RichText::new(mode).size(11.0).weak());
        });
    });
}
