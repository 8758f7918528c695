//! Featured layout: one hero cell at 60% width, up to three side cells
//! stacked in the remaining 40%. Products beyond four are dropped.

use super::{ComposeContext, HEADER_HEIGHT, ProductRef, place_product};
use crate::scene::Scene;
use kurbo::{Rect, Size};

const SIDE_ROWS: usize = 3;
const HERO_SHARE: f64 = 0.6;

pub(super) fn fill(
    scene: &mut Scene,
    products: &[ProductRef],
    canvas_size: Size,
    ctx: &ComposeContext<'_>,
) {
    let Some(hero) = products.first() else {
        return;
    };
    let spacing = ctx.config.spacing;

    let content_width = canvas_size.width - 3.0 * spacing;
    let hero_width = content_width * HERO_SHARE;
    let side_width = content_width * (1.0 - HERO_SHARE);
    let available_height = canvas_size.height - HEADER_HEIGHT - 2.0 * spacing;

    let hero_cell = Rect::new(
        spacing,
        HEADER_HEIGHT + spacing,
        spacing + hero_width,
        HEADER_HEIGHT + spacing + available_height,
    );
    place_product(scene, hero, hero_cell, ctx);

    let side_x = 2.0 * spacing + hero_width;
    let side_height =
        (available_height - spacing * (SIDE_ROWS as f64 - 1.0)) / SIDE_ROWS as f64;
    for (row, product) in products.iter().skip(1).take(SIDE_ROWS).enumerate() {
        let y = HEADER_HEIGHT + spacing + row as f64 * (side_height + spacing);
        let cell = Rect::new(side_x, y, side_x + side_width, y + side_height);
        place_product(scene, product, cell, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{LayoutConfig, LayoutKind, compose, tests::products};
    use crate::objects::VectorObject;
    use crate::ports::{NullSink, PassthroughResolver};
    use kurbo::Size;

    fn images(scene: &crate::scene::Scene) -> Vec<&crate::objects::Image> {
        scene
            .objects_ordered()
            .filter_map(|o| match o {
                VectorObject::Image(img) => Some(img),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_caps_at_four_products() {
        let config = LayoutConfig::new(LayoutKind::Featured);
        let scene = compose(
            &products(9),
            &config,
            Size::new(1000.0, 800.0),
            &PassthroughResolver,
            &NullSink,
        )
        .unwrap();
        assert_eq!(images(&scene).len(), 4);
    }

    #[test]
    fn test_hero_is_widest_and_first() {
        let config = LayoutConfig::new(LayoutKind::Featured);
        let scene = compose(
            &products(4),
            &config,
            Size::new(1000.0, 800.0),
            &PassthroughResolver,
            &NullSink,
        )
        .unwrap();
        let imgs = images(&scene);
        let hero = imgs[0];
        for side in &imgs[1..] {
            assert!(hero.width > side.width);
            assert!(side.position.x > hero.position.x + hero.width - 1e-6);
        }
    }

    #[test]
    fn test_empty_product_list_yields_header_only() {
        let config = LayoutConfig::new(LayoutKind::Featured);
        let scene = compose(
            &[],
            &config,
            Size::new(1000.0, 800.0),
            &PassthroughResolver,
            &NullSink,
        )
        .unwrap();
        assert!(images(&scene).is_empty());
    }
}
