//! Masonry layout: shortest-column placement with aspect-derived heights.
//!
//! Item height comes from the resolved image's natural aspect ratio so a
//! given input always produces the same scene; an image with no known
//! size falls back to a square cell.

use super::{ComposeContext, HEADER_HEIGHT, ProductRef, caption_height, place_resolved};
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
    let spacing = config.spacing;
    let column_width =
        (canvas_size.width - spacing * (columns as f64 + 1.0)) / columns as f64;

    // Running bottom edge per column, starting at the header; spacing is
    // added per item, so the first row sits one gap below the band.
    let mut heights = vec![HEADER_HEIGHT; columns];

    for product in products {
        // Shortest column wins, ties to the lowest index.
        let column = heights
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0);

        // One resolver call per product; the same outcome drives both the
        // cell height and the placement below.
        let resolved = ctx.resolver.resolve(&product.image_url);
        let aspect = resolved
            .as_ref()
            .ok()
            .and_then(|r| r.natural_size)
            .map(|(w, h)| h as f64 / w as f64)
            .unwrap_or(1.0);
        let item_height = column_width * aspect + caption_height(config, product);

        let x = spacing + column as f64 * (column_width + spacing);
        let y = heights[column] + spacing;
        let cell = Rect::new(x, y, x + column_width, y + item_height);
        place_resolved(scene, product, cell, resolved, ctx);

        heights[column] = y + item_height;
    }
}

#[cfg(test)]
mod tests {
    use super::super::{LayoutConfig, LayoutKind, compose, tests::products};
    use crate::error::CoreResult;
    use crate::objects::VectorObject;
    use crate::ports::{ImageResolver, NullSink, PassthroughResolver, ResolvedImage};
    use kurbo::Size;

    struct SizedResolver;

    impl ImageResolver for SizedResolver {
        fn resolve(&self, image_url: &str) -> CoreResult<ResolvedImage> {
            // Tall portrait images, 2:3.
            Ok(ResolvedImage {
                url: image_url.to_string(),
                natural_size: Some((400, 600)),
            })
        }
    }

    #[test]
    fn test_every_product_placed_exactly_once() {
        let config = LayoutConfig::new(LayoutKind::Masonry);
        let scene = compose(
            &products(7),
            &config,
            Size::new(800.0, 600.0),
            &PassthroughResolver,
            &NullSink,
        )
        .unwrap();
        let placed = scene
            .objects_ordered()
            .filter(|o| matches!(o, VectorObject::Image(_)))
            .count();
        assert_eq!(placed, 7);
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let config = LayoutConfig::new(LayoutKind::Masonry);
        let items = products(5);
        let canvas = Size::new(800.0, 600.0);
        let a = compose(&items, &config, canvas, &SizedResolver, &NullSink).unwrap();
        let b = compose(&items, &config, canvas, &SizedResolver, &NullSink).unwrap();

        let positions = |scene: &crate::scene::Scene| -> Vec<kurbo::Point> {
            scene
                .objects_ordered()
                .filter_map(|o| match o {
                    VectorObject::Image(img) => Some(img.position),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_shortest_column_wins() {
        let mut config = LayoutConfig::new(LayoutKind::Masonry);
        config.columns = 3;
        let scene = compose(
            &products(3),
            &config,
            Size::new(800.0, 600.0),
            &SizedResolver,
            &NullSink,
        )
        .unwrap();
        // With equal heights the first three items go to columns 0, 1, 2.
        let xs: Vec<f64> = scene
            .objects_ordered()
            .filter_map(|o| match o {
                VectorObject::Image(img) => Some(img.position.x),
                _ => None,
            })
            .collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
    }

    #[test]
    fn test_resolver_called_once_per_product() {
        struct CountingResolver(std::sync::atomic::AtomicUsize);

        impl ImageResolver for CountingResolver {
            fn resolve(&self, image_url: &str) -> CoreResult<ResolvedImage> {
                self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                Ok(ResolvedImage {
                    url: image_url.to_string(),
                    natural_size: Some((400, 600)),
                })
            }
        }

        let resolver = CountingResolver(std::sync::atomic::AtomicUsize::new(0));
        let config = LayoutConfig::new(LayoutKind::Masonry);
        compose(
            &products(6),
            &config,
            Size::new(800.0, 600.0),
            &resolver,
            &NullSink,
        )
        .unwrap();
        assert_eq!(resolver.0.load(std::sync::atomic::Ordering::Relaxed), 6);
    }

    #[test]
    fn test_aspect_ratio_drives_height() {
        let mut config = LayoutConfig::new(LayoutKind::Masonry);
        config.show_product_info = false;
        config.show_prices = false;
        let scene = compose(
            &products(1),
            &config,
            Size::new(800.0, 600.0),
            &SizedResolver,
            &NullSink,
        )
        .unwrap();
        let img = scene
            .objects_ordered()
            .find_map(|o| match o {
                VectorObject::Image(img) => Some(img),
                _ => None,
            })
            .unwrap();
        // 2:3 portrait: cell height = width * 1.5.
        assert!((img.height - img.width * 1.5).abs() < 1e-6);
    }
}
