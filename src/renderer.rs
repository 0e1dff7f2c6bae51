use egui::Pos2;

use crate::resample;
use crate::style::StrokeStyle;
use crate::surface::RasterSurface;

/// Paints polylines and their arc-length markers onto a raster surface.
///
/// Both paint modes are full redraws of whatever they are given: painting
/// the same points twice with the same style yields the same pixels, and
/// neither mode ever clears the surface first.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrokeRenderer;

impl StrokeRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draws a rounded-cap segment for every consecutive pair of points
    pub fn paint_line(&self, surface: &mut RasterSurface, points: &[Pos2], style: &StrokeStyle) {
        for pair in points.windows(2) {
            surface.stroke_segment(pair[0], pair[1], style.width(), style.line_color());
        }
    }

    /// Draws a filled disc at every marker position along `points`.
    ///
    /// Returns the number of markers painted.
    pub fn paint_markers(
        &self,
        surface: &mut RasterSurface,
        points: &[Pos2],
        style: &StrokeStyle,
    ) -> usize {
        let radius = style.marker_radius();
        let mut count = 0;
        for marker in resample::markers(points, style.marker_spacing()) {
            surface.fill_disc(marker, radius, style.marker_color());
            count += 1;
        }
        count
    }

    /// One preview step: the whole line, then markers over the whole line
    /// when marker mode is on. Markers are recomputed from the first point
    /// every time because their placement depends on the distance walked
    /// since the start of the stroke.
    pub fn paint_preview(&self, surface: &mut RasterSurface, points: &[Pos2], style: &StrokeStyle) {
        self.paint_line(surface, points, style);
        if style.markers_enabled() {
            self.paint_markers(surface, points, style);
        }
    }
}
