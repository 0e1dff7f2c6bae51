use egui::{Color32, ColorImage, Pos2};
use image::{Rgba, RgbaImage};

use crate::error::RasterError;
use crate::geometry::{calculate_bounds, distance_to_line_segment, pixel_span};

/// The pixel buffer the user draws on.
///
/// Pixels are straight (unmultiplied) RGBA. A cleared surface is fully
/// transparent. Every mutation bumps [`RasterSurface::revision`] so the UI
/// knows when to re-upload its texture.
#[derive(Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    revision: u64,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("revision", &self.revision)
            .finish()
    }
}

impl RasterSurface {
    /// Create a transparent surface of the given size
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: RgbaImage::new(width, height),
            revision: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.touch();
    }

    /// Change dimensions. The contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        self.pixels = RgbaImage::new(width, height);
        self.touch();
        Ok(())
    }

    /// Clear the surface and draw `image` with its top-left corner at the
    /// origin. Parts of the image outside the surface are cropped.
    pub fn replace_with(&mut self, image: &RgbaImage) {
        self.pixels.fill(0);
        let width = self.width().min(image.width());
        let height = self.height().min(image.height());
        for y in 0..height {
            for x in 0..width {
                self.pixels.put_pixel(x, y, *image.get_pixel(x, y));
            }
        }
        self.touch();
    }

    /// Make this surface an exact copy of `other`, dimensions included
    pub fn copy_from(&mut self, other: &RasterSurface) {
        if self.size() == other.size() {
            self.pixels.copy_from_slice(other.pixels.as_raw());
        } else {
            self.pixels = other.pixels.clone();
        }
        self.touch();
    }

    /// Paint a segment with round caps: every pixel whose center lies within
    /// `width / 2` of the segment is composited with `color`.
    pub fn stroke_segment(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        let radius = width / 2.0;
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let bounds = calculate_bounds(&[from, to], radius);
        self.fill_where(bounds, color, |center| {
            distance_to_line_segment(center, from, to) <= radius
        });
    }

    /// Paint a filled disc
    pub fn fill_disc(&mut self, center: Pos2, radius: f32, color: Color32) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let bounds = calculate_bounds(&[center], radius);
        self.fill_where(bounds, color, |pixel_center| {
            pixel_center.distance(center) <= radius
        });
    }

    /// Convert to an egui image for texture upload
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }

    fn fill_where(&mut self, bounds: egui::Rect, color: Color32, covers: impl Fn(Pos2) -> bool) {
        let (x0, x1) = pixel_span(bounds.min.x, bounds.max.x, self.width());
        let (y0, y1) = pixel_span(bounds.min.y, bounds.max.y, self.height());
        let source = color.to_srgba_unmultiplied();

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                if covers(center) {
                    let pixel = self.pixels.get_pixel_mut(x, y);
                    *pixel = source_over(source, *pixel);
                }
            }
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Composite an unmultiplied source color over an unmultiplied destination
fn source_over(source: [u8; 4], dest: Rgba<u8>) -> Rgba<u8> {
    let sa = source[3] as f32 / 255.0;
    if sa >= 1.0 {
        return Rgba(source);
    }
    if sa <= 0.0 {
        return dest;
    }
    let da = dest[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(source[0], dest[0]),
        channel(source[1], dest[1]),
        channel(source[2], dest[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn test_zero_sized_surface_is_rejected() {
        assert!(RasterSurface::new(0, 10).is_err());
        let mut surface = RasterSurface::new(4, 4).unwrap();
        assert!(surface.resize(4, 0).is_err());
        assert_eq!(surface.size(), [4, 4]);
    }

    #[test]
    fn test_segment_covers_its_path_and_caps() {
        let mut surface = RasterSurface::new(20, 10).unwrap();
        surface.stroke_segment(pos2(4.0, 5.0), pos2(15.0, 5.0), 2.0, Color32::RED);

        assert_eq!(surface.pixel(10, 4), Some(RED));
        assert_eq!(surface.pixel(10, 5), Some(RED));
        // round cap extends past the endpoint
        assert_eq!(surface.pixel(3, 4), Some(RED));
        assert_eq!(surface.pixel(10, 7), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(18, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_disc_is_round() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.fill_disc(pos2(10.0, 10.0), 4.0, Color32::RED);
        assert_eq!(surface.pixel(10, 10), Some(RED));
        assert_eq!(surface.pixel(13, 10), Some(RED));
        // corner of the bounding box stays empty
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_painting_outside_is_clipped() {
        let mut surface = RasterSurface::new(8, 8).unwrap();
        surface.stroke_segment(pos2(-50.0, -50.0), pos2(-10.0, -10.0), 4.0, Color32::RED);
        surface.fill_disc(pos2(100.0, 4.0), 3.0, Color32::RED);
        assert!(surface.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_replace_with_clears_and_anchors_at_origin() {
        let mut surface = RasterSurface::new(6, 6).unwrap();
        surface.fill_disc(pos2(5.0, 5.0), 2.0, Color32::RED);

        let small = RgbaImage::from_pixel(2, 3, Rgba([0, 0, 255, 255]));
        surface.replace_with(&small);
        assert_eq!(surface.pixel(1, 2), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 0]));

        let large = RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255]));
        surface.replace_with(&large);
        assert_eq!(surface.pixel(5, 5), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_translucent_paint_blends() {
        let mut surface = RasterSurface::new(2, 2).unwrap();
        surface.fill_disc(pos2(1.0, 1.0), 2.0, Color32::WHITE);
        surface.fill_disc(pos2(1.0, 1.0), 2.0, Color32::from_rgba_unmultiplied(0, 0, 0, 128));
        let [r, g, b, a] = surface.pixel(0, 0).unwrap();
        assert_eq!(a, 255);
        assert!(r > 120 && r < 135 && r == g && g == b);
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut surface = RasterSurface::new(4, 4).unwrap();
        let start = surface.revision();
        surface.clear();
        surface.fill_disc(pos2(2.0, 2.0), 1.0, Color32::RED);
        assert_eq!(surface.revision(), start + 2);
    }
}
