use egui::Color32;

use crate::error::StyleError;

pub const MIN_BRUSH_WIDTH: f32 = 1.0;
pub const MAX_BRUSH_WIDTH: f32 = 50.0;
pub const MIN_MARKER_SPACING: f32 = 1.0;
pub const MAX_MARKER_SPACING: f32 = 200.0;

/// Paint settings applied to every redraw of a stroke.
///
/// The style is read live: the controls panel mutates it between frames and
/// the renderer picks up whatever values are current, so a change made
/// mid-stroke affects the rest of that stroke's preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    width: f32,
    line_color: Color32,
    marker_color: Color32,
    marker_spacing: f32,
    markers_enabled: bool,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 5.0,
            line_color: Color32::BLACK,
            marker_color: Color32::RED,
            marker_spacing: 20.0,
            markers_enabled: false,
        }
    }
}

impl StrokeStyle {
    /// Build a style, rejecting widths and spacings that are not positive
    pub fn new(
        width: f32,
        line_color: Color32,
        marker_color: Color32,
        marker_spacing: f32,
        markers_enabled: bool,
    ) -> Result<Self, StyleError> {
        Ok(Self {
            width: validate_width(width)?,
            line_color,
            marker_color,
            marker_spacing: validate_spacing(marker_spacing)?,
            markers_enabled,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) -> Result<(), StyleError> {
        self.width = validate_width(width)?;
        Ok(())
    }

    /// Mutable access for slider widgets; values are clamped back into range
    /// by [`StrokeStyle::normalize`] after the UI pass.
    pub fn width_mut(&mut self) -> &mut f32 {
        &mut self.width
    }

    pub fn line_color(&self) -> Color32 {
        self.line_color
    }

    pub fn line_color_mut(&mut self) -> &mut Color32 {
        &mut self.line_color
    }

    pub fn marker_color(&self) -> Color32 {
        self.marker_color
    }

    pub fn marker_color_mut(&mut self) -> &mut Color32 {
        &mut self.marker_color
    }

    pub fn marker_spacing(&self) -> f32 {
        self.marker_spacing
    }

    pub fn set_marker_spacing(&mut self, spacing: f32) -> Result<(), StyleError> {
        self.marker_spacing = validate_spacing(spacing)?;
        Ok(())
    }

    pub fn marker_spacing_mut(&mut self) -> &mut f32 {
        &mut self.marker_spacing
    }

    pub fn markers_enabled(&self) -> bool {
        self.markers_enabled
    }

    pub fn markers_enabled_mut(&mut self) -> &mut bool {
        &mut self.markers_enabled
    }

    /// Marker radius, half the brush width
    pub fn marker_radius(&self) -> f32 {
        self.width / 2.0
    }

    /// Pull width and spacing back into their slider ranges
    pub fn normalize(&mut self) {
        if !self.width.is_finite() {
            self.width = MIN_BRUSH_WIDTH;
        }
        if !self.marker_spacing.is_finite() {
            self.marker_spacing = MIN_MARKER_SPACING;
        }
        self.width = self.width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH);
        self.marker_spacing = self
            .marker_spacing
            .clamp(MIN_MARKER_SPACING, MAX_MARKER_SPACING);
    }
}

fn validate_width(width: f32) -> Result<f32, StyleError> {
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(StyleError::InvalidWidth(width))
    }
}

fn validate_spacing(spacing: f32) -> Result<f32, StyleError> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(spacing)
    } else {
        Err(StyleError::InvalidSpacing(spacing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_values() {
        assert_eq!(
            StrokeStyle::new(0.0, Color32::BLACK, Color32::RED, 10.0, false),
            Err(StyleError::InvalidWidth(0.0))
        );
        assert_eq!(
            StrokeStyle::new(3.0, Color32::BLACK, Color32::RED, -1.0, false),
            Err(StyleError::InvalidSpacing(-1.0))
        );
        assert!(StrokeStyle::new(f32::NAN, Color32::BLACK, Color32::RED, 10.0, false).is_err());
    }

    #[test]
    fn test_setters_keep_previous_value_on_error() {
        let mut style = StrokeStyle::default();
        assert!(style.set_width(-2.0).is_err());
        assert_eq!(style.width(), 5.0);
        style.set_width(8.0).unwrap();
        assert_eq!(style.marker_radius(), 4.0);
    }

    #[test]
    fn test_normalize_clamps_slider_values() {
        let mut style = StrokeStyle::default();
        *style.width_mut() = 500.0;
        *style.marker_spacing_mut() = f32::INFINITY;
        style.normalize();
        assert_eq!(style.width(), MAX_BRUSH_WIDTH);
        assert_eq!(style.marker_spacing(), MIN_MARKER_SPACING);
    }
}
