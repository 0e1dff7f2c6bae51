use thiserror::Error;

/// Errors raised while moving pixels in or out of the raster surface
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("decode task was dropped before completing")]
    Cancelled,
}

/// Errors raised when a stroke style value is out of range
#[derive(Error, Debug, PartialEq)]
pub enum StyleError {
    #[error("brush width must be a positive number, got {0}")]
    InvalidWidth(f32),
    #[error("marker spacing must be a positive number, got {0}")]
    InvalidSpacing(f32),
}

/// Errors raised while handing an exported image to the user
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("browser download failed: {0}")]
    Download(String),
}
