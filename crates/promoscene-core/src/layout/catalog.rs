//! Catalog layout: one row per product (thumbnail + text block +
//! separator line), paginated against the canvas height.
//!
//! Pagination stops before the first row whose bottom edge would cross
//! `canvas_height - spacing`; the remaining products are simply not placed
//! in this scene. Composing further pages is the caller's business.

use super::{ComposeContext, HEADER_HEIGHT, ProductRef, row_separator};
use crate::objects::{FontWeight, Image, Rectangle, SerializableColor, Text};
use crate::ports::EventCategory;
use crate::scene::Scene;
use kurbo::{Point, Size};

/// Fixed per-row height, thumbnail included.
pub const ROW_HEIGHT: f64 = 150.0;

const THUMB_WIDTH: f64 = 130.0;

pub(super) fn fill(
    scene: &mut Scene,
    products: &[ProductRef],
    canvas_size: Size,
    ctx: &ComposeContext<'_>,
) {
    let config = ctx.config;
    let spacing = config.spacing;
    let limit = canvas_size.height - spacing;

    for (row, product) in products.iter().enumerate() {
        let bottom = HEADER_HEIGHT + (row as f64 + 1.0) * ROW_HEIGHT;
        if bottom > limit {
            break;
        }
        let top = HEADER_HEIGHT + row as f64 * ROW_HEIGHT;
        place_row(scene, product, top, canvas_size, ctx);
        row_separator(scene, bottom, canvas_size.width, spacing);
    }
}

fn place_row(
    scene: &mut Scene,
    product: &ProductRef,
    top: f64,
    canvas_size: Size,
    ctx: &ComposeContext<'_>,
) {
    let spacing = ctx.config.spacing;
    let thumb_height = ROW_HEIGHT - 2.0 * spacing;
    let thumb_origin = Point::new(spacing, top + spacing);

    match ctx.resolver.resolve(&product.image_url) {
        Ok(resolved) => {
            let mut image = Image::new(thumb_origin, resolved.url, THUMB_WIDTH, thumb_height);
            image.natural_size = resolved.natural_size;
            scene.add_object(image.into());
        }
        Err(err) => {
            ctx.events.notify(
                EventCategory::LoadFailure,
                &format!("product {}: {}", product.code, err),
            );
            let placeholder = Rectangle::new(thumb_origin, THUMB_WIDTH, thumb_height)
                .with_fill(SerializableColor::placeholder_gray());
            scene.add_object(placeholder.into());
        }
    }

    let text_x = 2.0 * spacing + THUMB_WIDTH;
    let text_width = canvas_size.width - text_x - spacing;
    let mut y = top + spacing;

    let code = Text::new(Point::new(text_x, y), product.code.clone())
        .with_font_size(20.0)
        .with_weight(FontWeight::Bold)
        .with_bounding_width(text_width);
    scene.add_object(code.into());
    y += 30.0;

    if ctx.config.show_product_info {
        let mut detail = product.color.clone();
        if let Some(size) = &product.size {
            detail.push_str(" · ");
            detail.push_str(size);
        }
        let info = Text::new(Point::new(text_x, y), detail)
            .with_font_size(15.0)
            .with_bounding_width(text_width);
        scene.add_object(info.into());
        y += 24.0;
    }

    if ctx.config.show_prices {
        if let Some(price) = product.price {
            let text = Text::new(Point::new(text_x, y), format!("{price:.2} €"))
                .with_font_size(17.0)
                .with_weight(FontWeight::Bold);
            scene.add_object(text.into());
        }
    }
}
