//! Grid layout: equal cells, row-major, capped at `columns * rows`.

use super::{ComposeContext, HEADER_HEIGHT, ProductRef, place_product};
use crate::scene::Scene;
use kurbo::{Rect, Size};

pub(super) fn fill(
    scene: &mut Scene,
    products: &[ProductRef],
    canvas_size: Size,
    ctx: &ComposeContext<'_>,
) {
    let config = ctx.config;
    let columns = config.columns;
    let rows = config.rows;
    let spacing = config.spacing;

    let cell_width =
        (canvas_size.width - spacing * (columns as f64 + 1.0)) / columns as f64;
    let available_height = canvas_size.height - HEADER_HEIGHT;
    let cell_height =
        (available_height - spacing * (rows as f64 + 1.0)) / rows as f64;

    // Products beyond capacity are dropped, not an error.
    let capacity = columns * rows;
    for (index, product) in products.iter().take(capacity).enumerate() {
        let col = index % columns;
        let row = index / columns;
        let x = spacing + col as f64 * (cell_width + spacing);
        let y = HEADER_HEIGHT + spacing + row as f64 * (cell_height + spacing);
        let cell = Rect::new(x, y, x + cell_width, y + cell_height);
        place_product(scene, product, cell, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{LayoutConfig, LayoutKind, compose, tests::products};
    use crate::objects::VectorObject;
    use crate::ports::{NullSink, PassthroughResolver};
    use kurbo::Size;

    fn image_count(scene: &crate::scene::Scene) -> usize {
        scene
            .objects_ordered()
            .filter(|o| matches!(o, VectorObject::Image(_)))
            .count()
    }

    #[test]
    fn test_capacity_truncates_silently() {
        // 3x2 grid, 10 products: exactly 6 placed.
        let config = LayoutConfig::new(LayoutKind::Grid);
        let scene = compose(
            &products(10),
            &config,
            Size::new(800.0, 600.0),
            &PassthroughResolver,
            &NullSink,
        )
        .unwrap();
        assert_eq!(image_count(&scene), 6);
    }

    #[test]
    fn test_cells_stay_inside_canvas() {
        let config = LayoutConfig::new(LayoutKind::Grid);
        let canvas = Size::new(800.0, 600.0);
        let scene = compose(&products(6), &config, canvas, &PassthroughResolver, &NullSink)
            .unwrap();
        for object in scene.objects_ordered() {
            if let VectorObject::Image(img) = object {
                assert!(img.position.x + img.width <= canvas.width + 1e-6);
                assert!(img.position.y + img.height <= canvas.height + 1e-6);
            }
        }
    }

    #[test]
    fn test_row_major_order() {
        let config = LayoutConfig::new(LayoutKind::Grid);
        let scene = compose(
            &products(6),
            &config,
            Size::new(800.0, 600.0),
            &PassthroughResolver,
            &NullSink,
        )
        .unwrap();
        let images: Vec<_> = scene
            .objects_ordered()
            .filter_map(|o| match o {
                VectorObject::Image(img) => Some(img.position),
                _ => None,
            })
            .collect();
        assert_eq!(images.len(), 6);
        // First three share a row, the fourth starts the next row.
        assert_eq!(images[0].y, images[1].y);
        assert_eq!(images[1].y, images[2].y);
        assert!(images[3].y > images[2].y);
        assert!(images[0].x < images[1].x);
    }
}
