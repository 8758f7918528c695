//! Layout composer: pure functions that turn a product list plus a
//! configuration into a populated scene.
//!
//! Four algorithms share a common contract: config validation fails fast
//! before anything is placed, every layout gets a header band, and a
//! product whose image fails to resolve is replaced by a placeholder
//! rectangle in its cell instead of aborting the composition.

mod catalog;
mod featured;
mod grid;
mod masonry;

use crate::error::{CoreError, CoreResult};
use crate::objects::{
    FontWeight, Image, Line, Rectangle, SerializableColor, Text, TextAlign,
};
use crate::ports::{EventCategory, EventSink, ImageResolver, ResolvedImage};
use crate::scene::Scene;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Height of the header band added to every layout.
pub const HEADER_HEIGHT: f64 = 120.0;

/// Caption strip heights inside a product cell.
const INFO_HEIGHT: f64 = 28.0;
const PRICE_HEIGHT: f64 = 22.0;

/// Side of the QR placeholder square in the bottom-left corner.
const QR_SIZE: f64 = 60.0;

/// The four composition algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Grid,
    Masonry,
    Featured,
    Catalog,
}

/// Immutable input to `compose`. Not part of the scene's own state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub kind: LayoutKind,
    pub columns: usize,
    pub rows: usize,
    pub spacing: f64,
    pub show_product_info: bool,
    pub show_prices: bool,
    pub show_qr_code: bool,
    pub show_logo: bool,
    pub background: SerializableColor,
    pub brand_color: Option<SerializableColor>,
    pub brand_name: Option<String>,
}

impl LayoutConfig {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            columns: 3,
            rows: 2,
            spacing: 10.0,
            show_product_info: true,
            show_prices: true,
            show_qr_code: false,
            show_logo: true,
            background: SerializableColor::white(),
            brand_color: None,
            brand_name: None,
        }
    }

    /// All-or-nothing validation, run before anything is placed.
    fn validate(&self) -> CoreResult<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(CoreError::InvalidConfig(format!(
                "columns and rows must be positive (got {}x{})",
                self.columns, self.rows
            )));
        }
        if self.spacing <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "spacing must be positive (got {})",
                self.spacing
            )));
        }
        Ok(())
    }
}

/// A product to place, consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: String,
    pub code: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
}

/// Shared collaborators threaded through a single composition call.
pub(crate) struct ComposeContext<'a> {
    pub config: &'a LayoutConfig,
    pub resolver: &'a dyn ImageResolver,
    pub events: &'a dyn EventSink,
}

/// Compose a scene from a product list. Deterministic for a given input;
/// fails fast on an invalid config without placing anything.
pub fn compose(
    products: &[ProductRef],
    config: &LayoutConfig,
    canvas_size: Size,
    resolver: &dyn ImageResolver,
    events: &dyn EventSink,
) -> CoreResult<Scene> {
    config.validate()?;

    let mut scene = Scene::new(canvas_size, config.background);
    let ctx = ComposeContext {
        config,
        resolver,
        events,
    };

    add_header(&mut scene, products, config, canvas_size);

    match config.kind {
        LayoutKind::Grid => grid::fill(&mut scene, products, canvas_size, &ctx),
        LayoutKind::Masonry => masonry::fill(&mut scene, products, canvas_size, &ctx),
        LayoutKind::Featured => featured::fill(&mut scene, products, canvas_size, &ctx),
        LayoutKind::Catalog => catalog::fill(&mut scene, products, canvas_size, &ctx),
    }

    if config.show_qr_code {
        add_qr_placeholder(&mut scene, config, canvas_size);
    }

    Ok(scene)
}

/// Header band across the top, plus the brand title in the top-right
/// corner when the logo is enabled.
fn add_header(
    scene: &mut Scene,
    products: &[ProductRef],
    config: &LayoutConfig,
    canvas_size: Size,
) {
    let band_color = config
        .brand_color
        .unwrap_or_else(SerializableColor::placeholder_gray);
    let band = Rectangle::new(Point::ZERO, canvas_size.width, HEADER_HEIGHT)
        .with_fill(band_color);
    scene.add_object(band.into());

    if config.show_logo {
        let brand = config
            .brand_name
            .clone()
            .or_else(|| products.iter().find_map(|p| p.brand_name.clone()));
        if let Some(brand) = brand {
            let title = Text::new(
                Point::new(canvas_size.width - config.spacing, config.spacing),
                brand,
            )
            .with_font_size(32.0)
            .with_weight(FontWeight::Bold)
            .with_align(TextAlign::Right);
            scene.add_object(title.into());
        }
    }
}

/// QR code stand-in: a stroked square in the bottom-left corner. The real
/// code is rendered by the delivery surface, not this engine.
fn add_qr_placeholder(scene: &mut Scene, config: &LayoutConfig, canvas_size: Size) {
    let mut square = Rectangle::new(
        Point::new(
            config.spacing,
            canvas_size.height - QR_SIZE - config.spacing,
        ),
        QR_SIZE,
        QR_SIZE,
    );
    square.style.fill = Some(SerializableColor::white());
    square.style.stroke = SerializableColor::black();
    square.style.stroke_width = 2.0;
    scene.add_object(square.into());
}

/// Vertical space a cell reserves below its image for captions.
pub(crate) fn caption_height(config: &LayoutConfig, product: &ProductRef) -> f64 {
    let mut height = 0.0;
    if config.show_product_info {
        height += INFO_HEIGHT;
    }
    if config.show_prices && product.price.is_some() {
        height += PRICE_HEIGHT;
    }
    height
}

/// Place one product into a cell: the image (or a placeholder rectangle
/// when the resolver fails) plus caption texts per the config flags.
pub(crate) fn place_product(
    scene: &mut Scene,
    product: &ProductRef,
    cell: Rect,
    ctx: &ComposeContext<'_>,
) {
    let resolved = ctx.resolver.resolve(&product.image_url);
    place_resolved(scene, product, cell, resolved, ctx);
}

/// Cell placement with the image already resolved. Layouts that need the
/// resolution ahead of placement (masonry uses the natural size for cell
/// height) resolve once and hand the outcome through here.
pub(crate) fn place_resolved(
    scene: &mut Scene,
    product: &ProductRef,
    cell: Rect,
    resolved: CoreResult<ResolvedImage>,
    ctx: &ComposeContext<'_>,
) {
    let captions = caption_height(ctx.config, product);
    let image_area = Rect::new(cell.x0, cell.y0, cell.x1, (cell.y1 - captions).max(cell.y0));

    match resolved {
        Ok(resolved) => {
            let mut image = Image::new(
                image_area.origin(),
                resolved.url,
                image_area.width(),
                image_area.height(),
            );
            image.natural_size = resolved.natural_size;
            scene.add_object(image.into());
        }
        Err(err) => {
            ctx.events.notify(
                EventCategory::LoadFailure,
                &format!("product {}: {}", product.code, err),
            );
            let placeholder = Rectangle::new(
                image_area.origin(),
                image_area.width(),
                image_area.height(),
            )
            .with_fill(SerializableColor::placeholder_gray());
            scene.add_object(placeholder.into());
        }
    }

    let mut caption_y = image_area.y1 + 4.0;
    if ctx.config.show_product_info {
        let mut info = format!("{} · {}", product.code, product.color);
        if let Some(size) = &product.size {
            info.push_str(" · ");
            info.push_str(size);
        }
        let text = Text::new(Point::new(cell.x0, caption_y), info)
            .with_font_size(14.0)
            .with_bounding_width(cell.width());
        scene.add_object(text.into());
        caption_y += INFO_HEIGHT;
    }
    if ctx.config.show_prices {
        if let Some(price) = product.price {
            let text = Text::new(Point::new(cell.x0, caption_y), format!("{price:.2} €"))
                .with_font_size(16.0)
                .with_weight(FontWeight::Bold);
            scene.add_object(text.into());
        }
    }
}

/// Horizontal separator under a catalog row.
pub(crate) fn row_separator(scene: &mut Scene, y: f64, width: f64, spacing: f64) {
    let line = Line::horizontal(Point::new(spacing, y), width - 2.0 * spacing);
    scene.add_object(line.into());
}
