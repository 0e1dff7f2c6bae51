use crate::config::SketchConfig;
use crate::error::ExportError;
use crate::file_handler::{FileHandler, PickedFile};
use crate::input::{InputHandler, PositionSampler};
use crate::panels::{central_panel, tools_panel};
use crate::session::SketchSession;
use crate::style::StrokeStyle;
use crate::texture_manager::TextureManager;

pub struct SketchApp {
    config: SketchConfig,
    // Live brush settings, edited by the tools panel and read on every redraw
    style: StrokeStyle,
    // Created on the first frame, once the surface size is known
    session: Option<SketchSession>,
    sampler: PositionSampler,
    input: InputHandler,
    files: FileHandler,
    texture: TextureManager,
    // Last user-facing error, shown in the tools panel
    status: Option<String>,
}

impl Default for SketchApp {
    fn default() -> Self {
        Self::with_config(SketchConfig::default())
    }
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("Starting sketch surface");
        Self::default()
    }

    pub fn with_config(config: SketchConfig) -> Self {
        Self {
            style: config.initial_style,
            config,
            session: None,
            sampler: PositionSampler::default(),
            input: InputHandler::new(),
            files: FileHandler::new(),
            texture: TextureManager::new("sketch_surface"),
            status: None,
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StrokeStyle {
        &mut self.style
    }

    pub fn session(&self) -> Option<&SketchSession> {
        self.session.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.can_undo())
    }

    pub fn history_len(&self) -> usize {
        self.session.as_ref().map_or(0, |session| session.history_len())
    }

    pub fn history_capacity(&self) -> Option<usize> {
        self.session
            .as_ref()
            .and_then(|session| session.history_capacity())
    }

    pub fn stroke_state_name(&self) -> &'static str {
        self.session
            .as_ref()
            .map_or("Idle", |session| session.state().name())
    }

    /// Create the session on first use, or resize it when the available
    /// area changed. Resizing clears the surface.
    pub fn sync_surface_size(&mut self, width: u32, height: u32) {
        match &mut self.session {
            Some(session) => {
                if let Err(err) = session.resize(width, height) {
                    log::error!("Failed to resize surface: {}", err);
                }
            }
            None => match SketchSession::new(width, height, self.config.history_capacity) {
                Ok(session) => self.session = Some(session),
                Err(err) => log::error!("Failed to create surface: {}", err),
            },
        }
    }

    /// Route this frame's pointer and touch input into the stroke state machine
    pub fn handle_input(&mut self, ctx: &egui::Context, surface_rect: egui::Rect) {
        let Some(session) = &mut self.session else {
            return;
        };
        self.sampler.set_origin(surface_rect.min);
        for sample in self.input.process_input(ctx, surface_rect) {
            if let Some(input) = self.sampler.sample(sample) {
                session.handle_input(input, &self.style);
            }
        }
    }

    /// Apply finished decodes to the surface
    pub fn poll_loads(&mut self) {
        if let Some(session) = &mut self.session {
            session.poll_loads();
        }
    }

    /// Texture showing the current surface (or stroke preview), re-uploaded
    /// only when it changed
    pub fn surface_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let session = self.session.as_ref()?;
        let (surface, source) = session.displayed();
        Some(self.texture.sync(ctx, surface, source))
    }

    pub fn undo(&mut self) {
        if let Some(session) = &mut self.session {
            session.undo();
        }
    }

    pub fn clear(&mut self) {
        if let Some(session) = &mut self.session {
            session.clear();
        }
        self.status = None;
    }

    pub fn open_image(&mut self) {
        self.files.open_image_dialog();
    }

    pub fn load_image(&mut self, file: PickedFile) {
        match &mut self.session {
            Some(session) => {
                log::info!("Loading {} onto the surface", file.name);
                session.load(file.bytes);
                self.status = None;
            }
            None => log::warn!("No surface yet; ignoring {}", file.name),
        }
    }

    pub fn export(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let result = session
            .export()
            .map_err(ExportError::from)
            .and_then(|bytes| self.files.save_png(&bytes, &self.config.export_file_name));

        match result {
            Ok(true) => self.status = None,
            Ok(false) => log::debug!("Export dialog dismissed"),
            Err(err) => {
                log::error!("Export failed: {}", err);
                self.status = Some(format!("Export failed: {}", err));
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.files.is_picking()
            || self
                .session
                .as_ref()
                .is_some_and(|session| session.is_loading())
    }
}

impl eframe::App for SketchApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let incoming: Vec<PickedFile> = self
            .files
            .take_dropped_images(ctx)
            .into_iter()
            .chain(self.files.take_picked())
            .collect();
        for file in incoming {
            self.load_image(file);
        }

        tools_panel(self, ctx);
        central_panel(self, ctx);
        self.files.preview_files_being_dropped(ctx);

        // Decodes and web file pickers finish outside of input events
        if self.is_busy() {
            ctx.request_repaint();
        }
    }
}
