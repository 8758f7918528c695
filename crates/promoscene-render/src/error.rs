//! Render pipeline errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The SVG intermediate could not be built or parsed.
    #[error("SVG error: {0}")]
    Svg(String),
    /// Rasterization failed (pixmap allocation, degenerate size).
    #[error("Raster error: {0}")]
    Raster(String),
    /// Encoding the pixmap to the output format failed.
    #[error("Encode error: {0}")]
    Encode(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
