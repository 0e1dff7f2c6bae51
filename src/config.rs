use egui::Vec2;

use crate::style::StrokeStyle;

pub const EXPORT_FILE_NAME: &str = "canvas-drawing.png";

/// Startup settings for the sketch application
#[derive(Debug, Clone)]
pub struct SketchConfig {
    /// Fraction of the available width given to the drawing surface
    pub width_fraction: f32,
    /// Fraction of the available height given to the drawing surface
    pub height_fraction: f32,
    /// Maximum number of undo snapshots kept, `None` for unbounded
    pub history_capacity: Option<usize>,
    /// Suggested name for exported images
    pub export_file_name: String,
    /// Style the controls start out with
    pub initial_style: StrokeStyle,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            width_fraction: 0.9,
            height_fraction: 0.6,
            history_capacity: None,
            export_file_name: EXPORT_FILE_NAME.to_owned(),
            initial_style: StrokeStyle::default(),
        }
    }
}

impl SketchConfig {
    /// Pixel size of the surface for the given available area, never below 1x1
    pub fn surface_size(&self, available: Vec2) -> [u32; 2] {
        let width = (available.x * self.width_fraction).floor().max(1.0);
        let height = (available.y * self.height_fraction).floor().max(1.0);
        [width as u32, height as u32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_uses_fractions() {
        let config = SketchConfig::default();
        assert_eq!(config.surface_size(egui::vec2(1000.0, 500.0)), [900, 300]);
    }

    #[test]
    fn test_surface_size_never_zero() {
        let config = SketchConfig::default();
        assert_eq!(config.surface_size(egui::vec2(0.0, -4.0)), [1, 1]);
    }
}
