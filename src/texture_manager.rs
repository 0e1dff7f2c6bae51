use egui::{Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::RasterSurface;

/// Keeps one GPU texture in sync with a raster surface.
///
/// The texture is re-uploaded only when the surface revision (or the
/// identity of the surface being shown) changes since the last upload.
pub struct TextureManager {
    name: String,
    handle: Option<TextureHandle>,
    uploaded: Option<(u64, u64, [u32; 2])>,
    uploads: u64,
}

impl TextureManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
            uploaded: None,
            uploads: 0,
        }
    }

    /// Upload `surface` if it changed and return the texture to draw.
    ///
    /// `source` distinguishes surfaces that share revision numbers, such as
    /// the committed surface and the stroke preview frame.
    pub fn sync(&mut self, ctx: &Context, surface: &RasterSurface, source: u64) -> TextureId {
        let key = (source, surface.revision(), surface.size());
        if let Some(handle) = &mut self.handle {
            if self.uploaded != Some(key) {
                handle.set(surface.to_color_image(), TextureOptions::NEAREST);
                self.uploaded = Some(key);
                self.uploads += 1;
            }
            return handle.id();
        }

        let handle = ctx.load_texture(&self.name, surface.to_color_image(), TextureOptions::NEAREST);
        let id = handle.id();
        self.handle = Some(handle);
        self.uploaded = Some(key);
        self.uploads += 1;
        id
    }

    /// Number of uploads performed so far
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}
