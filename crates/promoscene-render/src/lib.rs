//! PromoScene Render Library
//!
//! Raster export for composed scenes: SVG intermediate representation,
//! resvg/tiny-skia rasterization, PNG/JPEG encoding, and the image
//! fetching boundary used to embed product photos.

pub mod error;
pub mod fetch;
pub mod raster;
mod svg;

pub use error::{RenderError, RenderResult};
pub use fetch::{FileFetcher, ImageFetcher, ImageFormat, NoFetcher, data_uri};
pub use raster::{RasterFormat, RasterOptions, SceneExporter};
pub use svg::scene_to_svg;
