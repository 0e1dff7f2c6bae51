use egui::{Color32, Rect, Sense, Stroke, pos2, vec2};

use crate::SketchApp;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let [width, height] = app.config().surface_size(ui.available_size());
        let (response, painter) =
            ui.allocate_painter(vec2(width as f32, height as f32), Sense::drag());
        let surface_rect = response.rect;

        app.sync_surface_size(width, height);

        // Handle input
        app.handle_input(ctx, surface_rect);
        app.poll_loads();

        // Render the surface over a white page; transparent pixels show through
        painter.rect_filled(surface_rect, 0.0, Color32::WHITE);
        if let Some(texture_id) = app.surface_texture(ctx) {
            painter.image(
                texture_id,
                surface_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        painter.rect_stroke(surface_rect, 0.0, Stroke::new(1.0, Color32::GRAY));
    });
}
