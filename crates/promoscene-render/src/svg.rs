//! Scene to SVG intermediate representation.
//!
//! Every export path goes through this module: objects are walked in
//! z-order (recursing into groups through the scene arena) and written as
//! SVG elements. Images are embedded as base64 data URIs so the resulting
//! document is self-contained; a failed fetch degrades that one cell to a
//! placeholder box.

use crate::fetch::{ImageFetcher, data_uri};
use promoscene_core::objects::{Circle, Image, Line, LoadState, Rectangle, Text, TextAlign};
use promoscene_core::{Scene, VectorObject};
use std::fmt::Write;

/// Fill color for image cells whose bytes could not be fetched.
const PLACEHOLDER_FILL: &str = "#e0e0e0";

/// Render a scene to an SVG string at `multiplier` times its canvas size.
pub fn scene_to_svg(scene: &Scene, multiplier: f64, fetcher: &dyn ImageFetcher) -> String {
    let view_w = scene.canvas_size.width.max(1.0);
    let view_h = scene.canvas_size.height.max(1.0);
    let out_w = (view_w * multiplier).round().max(1.0) as u32;
    let out_h = (view_h * multiplier).round().max(1.0) as u32;

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
    );

    // Background
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        scene.background.to_rgba_string(),
    );

    for &id in scene.z_order() {
        render_object(&mut svg, scene, id, fetcher);
    }

    svg.push_str("</svg>");
    svg
}

fn render_object(svg: &mut String, scene: &Scene, id: promoscene_core::ObjectId, fetcher: &dyn ImageFetcher) {
    let Some(object) = scene.get(id) else { return };
    if !object.flags().visible {
        return;
    }

    match object {
        VectorObject::Rectangle(rect) => render_rectangle(svg, rect),
        VectorObject::Circle(circle) => render_circle(svg, circle),
        VectorObject::Line(line) => render_line(svg, line),
        VectorObject::Text(text) => render_text(svg, text),
        VectorObject::Image(image) => render_image(svg, image, fetcher),
        VectorObject::Group(group) => {
            group_open(svg, object);
            for &child in group.children() {
                render_object(svg, scene, child, fetcher);
            }
            svg.push_str("</g>");
        }
    }
}

/// Opacity and rotation attributes shared by the leaf renderers. The
/// rotation pivot is the object's bounds center.
fn common_attrs(object_opacity: f64, rotation_degrees: f64, cx: f64, cy: f64) -> String {
    let mut attrs = String::new();
    if object_opacity < 1.0 {
        let _ = write!(attrs, " opacity=\"{object_opacity}\"");
    }
    if rotation_degrees != 0.0 {
        let _ = write!(attrs, " transform=\"rotate({rotation_degrees} {cx} {cy})\"");
    }
    attrs
}

fn stroke_attrs(style: &promoscene_core::objects::ObjectStyle) -> String {
    if style.stroke_width > 0.0 {
        format!(
            " stroke=\"{}\" stroke-width=\"{}\"",
            style.stroke.to_rgba_string(),
            style.stroke_width
        )
    } else {
        String::new()
    }
}

fn render_rectangle(svg: &mut String, rect: &Rectangle) {
    let bounds = rect.bounds();
    let fill = rect
        .style
        .fill
        .map_or_else(|| "none".to_string(), |c| c.to_rgba_string());
    let _ = write!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{fill}\"{}{}/>",
        bounds.x0,
        bounds.y0,
        bounds.width(),
        bounds.height(),
        stroke_attrs(&rect.style),
        common_attrs(
            rect.style.opacity,
            rect.rotation_degrees,
            bounds.center().x,
            bounds.center().y
        ),
    );
}

fn render_circle(svg: &mut String, circle: &Circle) {
    let rx = circle.radius * circle.scale.x.abs();
    let ry = circle.radius * circle.scale.y.abs();
    let fill = circle
        .style
        .fill
        .map_or_else(|| "none".to_string(), |c| c.to_rgba_string());
    let _ = write!(
        svg,
        "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{rx}\" ry=\"{ry}\" fill=\"{fill}\"{}{}/>",
        circle.position.x,
        circle.position.y,
        stroke_attrs(&circle.style),
        common_attrs(
            circle.style.opacity,
            circle.rotation_degrees,
            circle.position.x,
            circle.position.y
        ),
    );
}

fn render_line(svg: &mut String, line: &Line) {
    // Lines always stroke, even at the default width.
    let width = if line.style.stroke_width > 0.0 {
        line.style.stroke_width
    } else {
        1.0
    };
    let _ = write!(
        svg,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{width}\"{}/>",
        line.position.x,
        line.position.y,
        line.end.x,
        line.end.y,
        line.style.stroke.to_rgba_string(),
        common_attrs(
            line.style.opacity,
            line.rotation_degrees,
            (line.position.x + line.end.x) / 2.0,
            (line.position.y + line.end.y) / 2.0
        ),
    );
}

fn render_text(svg: &mut String, text: &Text) {
    let escaped = escape_xml(&text.content);
    let fill = text
        .style
        .fill
        .map_or_else(|| "#000000".to_string(), |c| c.to_rgba_string());
    let anchor = match text.text_align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    };
    // Baseline sits one em below the block's top edge.
    let baseline = text.position.y + text.font_size_pt;
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"{baseline}\" font-size=\"{}\" font-family=\"{}\" font-weight=\"{}\" text-anchor=\"{anchor}\" fill=\"{fill}\"{}>{escaped}</text>",
        text.position.x,
        text.font_size_pt,
        text.font_family.name(),
        text.font_weight.css_weight(),
        common_attrs(
            text.style.opacity,
            text.rotation_degrees,
            text.position.x,
            baseline
        ),
    );
}

fn render_image(svg: &mut String, image: &Image, fetcher: &dyn ImageFetcher) {
    let width = image.width * image.scale.x.abs();
    let height = image.height * image.scale.y.abs();
    let attrs = common_attrs(
        image.style.opacity,
        image.rotation_degrees,
        image.position.x + width / 2.0,
        image.position.y + height / 2.0,
    );

    let uri = if image.load_state == LoadState::Failed {
        None
    } else {
        match fetcher.fetch(&image.source_url) {
            Ok(bytes) => data_uri(&bytes),
            Err(reason) => {
                log::warn!("image fetch failed for {}: {reason}", image.source_url);
                None
            }
        }
    };

    match uri {
        Some(uri) => {
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{width}\" height=\"{height}\" href=\"{uri}\"{attrs}/>",
                image.position.x, image.position.y,
            );
        }
        None => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{width}\" height=\"{height}\" fill=\"{PLACEHOLDER_FILL}\" stroke=\"#999\" stroke-width=\"1\"{attrs}/>",
                image.position.x, image.position.y,
            );
        }
    }
}

fn group_open(svg: &mut String, object: &VectorObject) {
    let opacity = object.style().opacity;
    if opacity < 1.0 {
        let _ = write!(svg, "<g opacity=\"{opacity}\">");
    } else {
        svg.push_str("<g>");
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
