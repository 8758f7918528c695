//! Rasterization: SVG intermediate -> tiny-skia pixmap -> encoded bytes.

use crate::error::{RenderError, RenderResult};
use crate::fetch::ImageFetcher;
use crate::svg::scene_to_svg;
use image::ImageEncoder;
use promoscene_core::{EventCategory, EventSink, NullSink, Scene};
use std::sync::Arc;

/// Raster output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }
}

/// Export tuning knobs. Both are hints: `quality` only matters for lossy
/// formats and `multiplier` scales the canvas size for the output.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Resolution multiplier (e.g. 2.0 for retina output).
    pub multiplier: f64,
    /// JPEG quality 1-100. Ignored for PNG.
    pub quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            quality: 85,
        }
    }
}

/// Exports a scene to raster bytes through the SVG pipeline.
pub struct SceneExporter<F: ImageFetcher> {
    fetcher: F,
    options: RasterOptions,
    events: Arc<dyn EventSink>,
}

impl<F: ImageFetcher> SceneExporter<F> {
    pub fn new(fetcher: F, options: RasterOptions) -> Self {
        Self {
            fetcher,
            options,
            events: Arc::new(NullSink),
        }
    }

    /// Attach a sink so completed exports are reported to the host.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Export a scene to the given format. A completed export is reported
    /// through the sink; failures surface only through the returned error.
    pub fn export(&self, scene: &Scene, format: RasterFormat) -> RenderResult<Vec<u8>> {
        let bytes = match format {
            RasterFormat::Png => self.render_to_png(scene)?,
            RasterFormat::Jpeg => self.render_to_jpeg(scene)?,
        };
        self.events.notify(
            EventCategory::ExportComplete,
            &format!("{} export, {} bytes", format.extension(), bytes.len()),
        );
        Ok(bytes)
    }

    /// The SVG intermediate, exposed for vector output and debugging.
    pub fn render_to_svg(&self, scene: &Scene) -> String {
        scene_to_svg(scene, self.options.multiplier, &self.fetcher)
    }

    fn render_to_png(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(scene);
        let pixmap = rasterize_svg(&svg_string)?;

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
    }

    fn render_to_jpeg(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(scene);
        let pixmap = rasterize_svg(&svg_string)?;

        // JPEG has no alpha channel: composite over the scene background.
        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = scene.background;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in pixmap.data().chunks_exact(4) {
            let alpha = f32::from(pixel[3]) / 255.0;
            let inv = 1.0 - alpha;
            rgb_data.push((f32::from(pixel[0]).mul_add(alpha, f32::from(bg.r) * inv)) as u8);
            rgb_data.push((f32::from(pixel[1]).mul_add(alpha, f32::from(bg.g) * inv)) as u8);
            rgb_data.push((f32::from(pixel[2]).mul_add(alpha, f32::from(bg.b) * inv)) as u8);
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.options.quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Encode(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }
}

/// Rasterize an SVG string to a tiny-skia pixmap.
fn rasterize_svg(svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_string, &opt)
        .map_err(|e| RenderError::Svg(format!("SVG parsing failed: {e}")))?;

    let px_w = tree.size().width() as u32;
    let px_h = tree.size().height() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| RenderError::Raster("Failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::NoFetcher;
    use kurbo::{Point, Size};
    use promoscene_core::SerializableColor;
    use promoscene_core::objects::{Rectangle, Text};

    fn exporter() -> SceneExporter<NoFetcher> {
        SceneExporter::new(NoFetcher, RasterOptions::default())
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new(Size::new(120.0, 90.0), SerializableColor::white());
        scene.add_object(
            Rectangle::new(Point::new(10.0, 10.0), 60.0, 40.0)
                .with_fill(SerializableColor::new(200, 30, 30, 255))
                .into(),
        );
        scene.add_object(Text::new(Point::new(10.0, 60.0), "sale").into());
        scene
    }

    #[test]
    fn test_png_export_carries_magic_bytes() {
        let png = exporter().export(&sample_scene(), RasterFormat::Png).unwrap();
        assert!(png.len() > 8);
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_jpeg_export_carries_magic_bytes() {
        let jpeg = exporter()
            .export(&sample_scene(), RasterFormat::Jpeg)
            .unwrap();
        assert!(jpeg.len() > 2);
        assert_eq!(jpeg[0], 0xFF);
        assert_eq!(jpeg[1], 0xD8);
    }

    #[test]
    fn test_multiplier_doubles_pixel_dimensions() {
        let exporter = SceneExporter::new(
            NoFetcher,
            RasterOptions {
                multiplier: 2.0,
                ..Default::default()
            },
        );
        let png = exporter.export(&sample_scene(), RasterFormat::Png).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 240);
        assert_eq!(decoded.height(), 180);
    }

    #[test]
    fn test_export_reports_completion_through_sink() {
        #[derive(Default)]
        struct RecordingSink(std::sync::Mutex<Vec<(EventCategory, String)>>);

        impl EventSink for RecordingSink {
            fn notify(&self, category: EventCategory, message: &str) {
                self.0.lock().unwrap().push((category, message.to_string()));
            }
        }

        let sink = Arc::new(RecordingSink::default());
        let exporter = SceneExporter::new(NoFetcher, RasterOptions::default())
            .with_events(sink.clone());
        exporter.export(&sample_scene(), RasterFormat::Png).unwrap();

        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, EventCategory::ExportComplete);
        assert!(events[0].1.contains("png"));
    }

    #[test]
    fn test_empty_scene_still_exports() {
        let scene = Scene::new(Size::new(50.0, 50.0), SerializableColor::white());
        let png = exporter().export(&scene, RasterFormat::Png).unwrap();
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }
}
