#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod error;
pub mod file_handler;
mod geometry;
pub mod history;
pub mod input;
pub mod panels;
pub mod polyline;
pub mod raster_io;
pub mod renderer;
pub mod resample;
pub mod session;
pub mod style;
pub mod surface;
pub mod texture_manager;

pub use app::SketchApp;
pub use config::SketchConfig;
pub use error::{ExportError, RasterError, StyleError};
pub use history::{HistoryStack, Snapshot};
pub use input::{InputHandler, InputSample, PositionSampler, SamplePhase, StrokeInput};
pub use polyline::Polyline;
pub use renderer::StrokeRenderer;
pub use session::{SketchSession, StrokeState};
pub use style::StrokeStyle;
pub use surface::RasterSurface;
