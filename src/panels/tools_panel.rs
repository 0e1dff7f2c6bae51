use egui::color_picker::{Alpha, color_edit_button_srgba};
use egui::{Button, Color32, Slider};

use crate::SketchApp;
use crate::style::{MAX_BRUSH_WIDTH, MAX_MARKER_SPACING, MIN_BRUSH_WIDTH, MIN_MARKER_SPACING};

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Brush");
            ui.separator();

            let style = app.style_mut();
            ui.horizontal(|ui| {
                ui.label("Size:");
                ui.add(Slider::new(style.width_mut(), MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH));
            });
            ui.horizontal(|ui| {
                ui.label("Color:");
                color_edit_button_srgba(ui, style.line_color_mut(), Alpha::Opaque);
            });

            ui.separator();
            ui.heading("Points");
            ui.checkbox(style.markers_enabled_mut(), "Point mode");
            ui.horizontal(|ui| {
                ui.label("Color:");
                color_edit_button_srgba(ui, style.marker_color_mut(), Alpha::Opaque);
            });
            ui.horizontal(|ui| {
                ui.label("Spacing:");
                ui.add(Slider::new(
                    style.marker_spacing_mut(),
                    MIN_MARKER_SPACING..=MAX_MARKER_SPACING,
                ));
            });
            style.normalize();

            ui.separator();
            ui.heading("Canvas");

            ui.horizontal(|ui| {
                if ui.add_enabled(app.can_undo(), Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.button("Clear").clicked() {
                    app.clear();
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Load image…").clicked() {
                    app.open_image();
                }
                if ui.button("Export PNG").clicked() {
                    app.export();
                }
            });

            ui.separator();
            match app.history_capacity() {
                Some(capacity) => {
                    ui.label(format!("Undo stack size: {} / {}", app.history_len(), capacity))
                }
                None => ui.label(format!("Undo stack size: {}", app.history_len())),
            };
            ui.label(format!("Stroke: {}", app.stroke_state_name()));

            if let Some(status) = app.status() {
                ui.colored_label(Color32::LIGHT_RED, status);
            }
        });
}
