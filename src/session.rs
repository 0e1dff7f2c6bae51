//! The drawing session: everything the event handlers share.
//!
//! `SketchSession` owns the committed raster surface, the preview frame for
//! the stroke in progress, the polyline buffer, the undo history and the
//! queue of in-flight image decodes. All transitions run synchronously on the
//! caller's thread; the only state that changes outside an input event is
//! the surface, when [`SketchSession::poll_loads`] applies a finished decode.
//!
//! # Stroke lifecycle
//!
//! - `begin` (Idle or Active → Active): records the anchor and empties the
//!   polyline. The anchor itself is not part of the polyline.
//! - `extend` (Active → Active): appends a point and rebuilds the preview
//!   frame from the committed surface plus the whole polyline (and its
//!   markers when marker mode is on).
//! - `end` (Active → Idle): snapshots the committed surface, commits the
//!   last preview frame, repaints the final line when marker mode is off,
//!   then empties the polyline.
//!
//! `extend` and `end` while Idle do nothing.
//!
//! # Example
//!
//! ```rust
//! use eframe_sketch::{SketchSession, StrokeStyle};
//! use egui::pos2;
//!
//! let style = StrokeStyle::default();
//! let mut session = SketchSession::new(64, 64, None).unwrap();
//!
//! session.begin(pos2(4.0, 4.0));
//! session.extend(pos2(10.0, 10.0), &style);
//! session.extend(pos2(30.0, 12.0), &style);
//! assert!(session.end(&style));
//! assert_eq!(session.history_len(), 1);
//! ```
use egui::Pos2;

use crate::error::RasterError;
use crate::history::HistoryStack;
use crate::input::StrokeInput;
use crate::polyline::Polyline;
use crate::raster_io::{self, CompletedLoad, LoadKind, LoadQueue};
use crate::renderer::StrokeRenderer;
use crate::resample;
use crate::style::StrokeStyle;
use crate::surface::RasterSurface;

/// Texture source id for the committed surface
pub const SURFACE_SOURCE: u64 = 0;
/// Texture source id for the stroke preview frame
pub const PREVIEW_SOURCE: u64 = 1;

/// Where the stroke state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Active {
        /// Position the stroke was started at
        anchor: Pos2,
    },
}

impl StrokeState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active { .. } => "Active",
        }
    }
}

#[derive(Debug)]
pub struct SketchSession {
    surface: RasterSurface,
    preview: RasterSurface,
    polyline: Polyline,
    state: StrokeState,
    history: HistoryStack,
    loads: LoadQueue,
    renderer: StrokeRenderer,
    // Style of the last preview step, reused when the surface changes under
    // an active stroke
    preview_style: StrokeStyle,
}

impl SketchSession {
    /// Creates a session with a blank surface of the given size
    pub fn new(width: u32, height: u32, history_capacity: Option<usize>) -> Result<Self, RasterError> {
        let surface = RasterSurface::new(width, height)?;
        Ok(Self {
            preview: surface.clone(),
            surface,
            polyline: Polyline::new(),
            state: StrokeState::Idle,
            history: HistoryStack::with_capacity_limit(history_capacity),
            loads: LoadQueue::new(),
            renderer: StrokeRenderer::new(),
            preview_style: StrokeStyle::default(),
        })
    }

    /// Feed one stroke input through the state machine.
    ///
    /// Returns true if what the user sees may have changed.
    pub fn handle_input(&mut self, input: StrokeInput, style: &StrokeStyle) -> bool {
        match input {
            StrokeInput::Begin(pos) => {
                self.begin(pos);
                true
            }
            StrokeInput::Move(pos) => self.extend(pos, style),
            StrokeInput::End => self.end(style),
        }
    }

    /// Start a stroke at `anchor`, discarding any stroke in progress
    pub fn begin(&mut self, anchor: Pos2) {
        if self.is_drawing() {
            log::debug!("Restarting stroke; discarding {} points", self.polyline.len());
        }
        self.polyline.clear();
        self.preview.copy_from(&self.surface);
        self.state = StrokeState::Active { anchor };
        log::debug!("Stroke started at {:?}", anchor);
    }

    /// Append a point to the active stroke and redraw the preview.
    ///
    /// Returns false (and does nothing) when no stroke is active.
    pub fn extend(&mut self, pos: Pos2, style: &StrokeStyle) -> bool {
        if !self.is_drawing() {
            return false;
        }
        self.polyline.push(pos);
        self.preview_style = *style;
        self.rebuild_preview();
        true
    }

    /// Redraw the preview frame from the committed surface and the whole
    /// polyline
    fn rebuild_preview(&mut self) {
        self.preview.copy_from(&self.surface);
        self.renderer
            .paint_preview(&mut self.preview, self.polyline.points(), &self.preview_style);
    }

    /// Finish the active stroke and commit it to the surface.
    ///
    /// Returns false (and does nothing) when no stroke is active.
    pub fn end(&mut self, style: &StrokeStyle) -> bool {
        if !self.is_drawing() {
            return false;
        }

        if let Err(err) = self.history.push(&self.surface) {
            log::error!("Failed to snapshot surface before commit: {}", err);
        }

        if !self.polyline.is_empty() {
            self.surface.copy_from(&self.preview);
        }
        if !style.markers_enabled() {
            self.renderer
                .paint_line(&mut self.surface, self.polyline.points(), style);
        }

        log::info!(
            "Committed stroke: {} points, {:.1}px long, {} markers (history depth {})",
            self.polyline.len(),
            self.polyline.length(),
            if style.markers_enabled() {
                resample::markers(self.polyline.points(), style.marker_spacing()).count()
            } else {
                0
            },
            self.history.len()
        );

        self.polyline.clear();
        self.state = StrokeState::Idle;
        true
    }

    /// Wipe the surface and forget all undo history, including undo restores
    /// still decoding
    pub fn clear(&mut self) {
        self.surface.clear();
        self.history.clear();
        let dropped = self.loads.discard(LoadKind::Restore);
        if dropped > 0 {
            log::debug!("Dropped {} pending undo restores", dropped);
        }
        if self.is_drawing() {
            self.rebuild_preview();
        } else {
            self.preview.copy_from(&self.surface);
        }
        log::info!("Surface cleared");
    }

    /// Restore the most recent snapshot.
    ///
    /// The snapshot is decoded in the background and applied by a later
    /// [`SketchSession::poll_loads`]. Returns false when there is nothing to
    /// undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                let id = self.loads.submit(snapshot.into_bytes(), LoadKind::Restore);
                log::info!("Undo: restoring snapshot (load #{}, {} left)", id, self.history.len());
                true
            }
            None => {
                log::debug!("Undo requested with empty history");
                false
            }
        }
    }

    /// Start decoding an external image that will replace the surface
    pub fn load(&mut self, bytes: Vec<u8>) -> u64 {
        let id = self.loads.submit(bytes, LoadKind::Import);
        log::info!("Loading image (load #{}, {} in flight)", id, self.loads.in_flight());
        id
    }

    /// Encode the committed surface as PNG
    pub fn export(&self) -> Result<Vec<u8>, RasterError> {
        raster_io::encode_png(&self.surface)
    }

    /// Apply every decode that has finished. Returns how many changed the surface.
    pub fn poll_loads(&mut self) -> usize {
        let completed = self.loads.poll();
        self.apply_loads(completed)
    }

    /// Block until every pending decode has finished and apply them
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait_for_loads(&mut self) -> usize {
        let completed = self.loads.wait();
        self.apply_loads(completed)
    }

    fn apply_loads(&mut self, completed: Vec<CompletedLoad>) -> usize {
        let mut applied = 0;
        for load in completed {
            match load.result {
                Ok(image) => {
                    self.surface.replace_with(&image);
                    applied += 1;
                    log::info!(
                        "{:?} load #{} applied ({}x{})",
                        load.kind,
                        load.id,
                        image.width(),
                        image.height()
                    );
                }
                Err(err) => {
                    log::error!("{:?} load #{} failed: {}", load.kind, load.id, err);
                }
            }
        }
        // A stroke in progress stays on top of whatever was loaded under it
        if applied > 0 && self.is_drawing() {
            self.rebuild_preview();
        }
        applied
    }

    /// Match the surface to new viewport-derived dimensions. A real size
    /// change clears the surface; undo history is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, RasterError> {
        if self.surface.size() == [width, height] {
            return Ok(false);
        }
        self.surface.resize(width, height)?;
        if self.is_drawing() {
            self.rebuild_preview();
        } else {
            self.preview.copy_from(&self.surface);
        }
        log::debug!("Surface resized to {}x{}", width, height);
        Ok(true)
    }

    /// The image to show: the preview frame mid-stroke, else the surface,
    /// paired with its texture source id.
    pub fn displayed(&self) -> (&RasterSurface, u64) {
        if self.is_drawing() {
            (&self.preview, PREVIEW_SOURCE)
        } else {
            (&self.surface, SURFACE_SOURCE)
        }
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn preview(&self) -> &RasterSurface {
        &self.preview
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history_capacity(&self) -> Option<usize> {
        self.history.capacity()
    }

    /// True while any import or undo restore is still decoding
    pub fn is_loading(&self) -> bool {
        !self.loads.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_begin_does_not_record_anchor_point() {
        let mut session = SketchSession::new(20, 20, None).unwrap();
        session.begin(pos2(1.0, 1.0));
        assert_eq!(session.state(), StrokeState::Active { anchor: pos2(1.0, 1.0) });
        assert!(session.polyline().is_empty());
    }

    #[test]
    fn test_preview_does_not_touch_committed_surface() {
        let style = StrokeStyle::default();
        let mut session = SketchSession::new(20, 20, None).unwrap();
        session.begin(pos2(1.0, 1.0));
        session.extend(pos2(2.0, 2.0), &style);
        session.extend(pos2(15.0, 15.0), &style);

        assert!(session.surface().image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
        assert!(session.preview().image().pixels().any(|p| p.0 == [0, 0, 0, 255]));
        assert_eq!(session.displayed().1, PREVIEW_SOURCE);
    }

    #[test]
    fn test_begin_while_active_restarts() {
        let style = StrokeStyle::default();
        let mut session = SketchSession::new(20, 20, None).unwrap();
        session.begin(pos2(1.0, 1.0));
        session.extend(pos2(2.0, 2.0), &style);
        session.begin(pos2(9.0, 9.0));
        assert!(session.polyline().is_empty());
        assert!(session.preview().image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let style = StrokeStyle::default();
        let mut session = SketchSession::new(10, 10, None).unwrap();
        assert!(!session.extend(pos2(3.0, 3.0), &style));
        assert!(session.polyline().is_empty());
    }

    #[test]
    fn test_resize_clears_but_keeps_history() {
        let style = StrokeStyle::default();
        let mut session = SketchSession::new(20, 20, None).unwrap();
        session.begin(pos2(1.0, 1.0));
        session.extend(pos2(2.0, 2.0), &style);
        session.extend(pos2(10.0, 2.0), &style);
        session.end(&style);

        assert!(!session.resize(20, 20).unwrap());
        assert!(session.resize(30, 10).unwrap());
        assert_eq!(session.surface().size(), [30, 10]);
        assert!(session.surface().image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
        assert_eq!(session.history_len(), 1);
    }
}
