//! Constraint glyph decoration.
//!
//! Places the glyph of every constrained node just above the node's top-right
//! corner and assembles an SVG overlay of the diagram.

use log::debug;
use svg::{self, node::element as svg_element};

use strata_core::{
    apply_stroke,
    color::Color,
    constraint::Constraint,
    draw::{GlyphStyle, StrokeDefinition, glyph_size, render_constraint_glyph_at},
    geometry::{Bounds, Point},
    graph::GraphNode,
};

use crate::{constraints::ConstraintStore, diagram::Diagram};

/// Vertical gap between a node's top edge and its glyph.
const GLYPH_GAP: f32 = 2.0;

/// Padding around the diagram in the overlay document.
const OVERLAY_MARGIN: f32 = 10.0;

/// Returns the top-left corner of the glyph drawn for `node`, or `None` if
/// `constraint` draws nothing.
pub fn glyph_position(node: &GraphNode, constraint: &Constraint, style: &GlyphStyle) -> Option<Point> {
    let size = glyph_size(constraint, style)?;
    let corner = node.effective_bounds().top_right();
    Some(Point::new(
        corner.x() - size.width(),
        corner.y() - size.height() - GLYPH_GAP,
    ))
}

/// Renders the glyphs of all constrained nodes of `diagram`, in node order.
pub fn render_glyphs(
    diagram: &Diagram,
    store: &ConstraintStore,
    style: &GlyphStyle,
) -> Vec<svg_element::Group> {
    diagram
        .nodes()
        .iter()
        .filter_map(|node| {
            let constraint = store.get(node.key());
            let position = glyph_position(node, &constraint, style)?;
            render_constraint_glyph_at(&constraint, style, position)
                .map(|glyph| glyph.set("data-node", node.id()))
        })
        .collect()
}

/// Renders an SVG document showing node outlines and their constraint glyphs.
pub fn render_overlay(
    diagram: &Diagram,
    store: &ConstraintStore,
    style: &GlyphStyle,
) -> svg::Document {
    let content = overlay_bounds(diagram, style);
    let (width, height) = (
        content.width() + 2.0 * OVERLAY_MARGIN,
        content.height() + 2.0 * OVERLAY_MARGIN,
    );

    let outline = StrokeDefinition::new(Color::default().with_alpha(0.4), 1.0);
    let mut nodes = svg_element::Group::new().set("class", "nodes");
    for node in diagram.nodes() {
        let bounds = node.effective_bounds();
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", "none")
            .set("data-node", node.id());
        nodes = nodes.add(apply_stroke!(rect, &outline));
    }

    let glyphs = render_glyphs(diagram, store, style);
    debug!(glyphs = glyphs.len(); "Rendering constraint overlay");
    let glyphs = glyphs.into_iter().fold(
        svg_element::Group::new().set("class", "constraint-glyphs"),
        |group, glyph| group.add(glyph),
    );

    svg::Document::new()
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                content.min_x() - OVERLAY_MARGIN,
                content.min_y() - OVERLAY_MARGIN,
                width,
                height
            ),
        )
        .set("width", width)
        .set("height", height)
        .add(nodes)
        .add(glyphs)
}

/// Returns the bounds of the diagram grown to include the space glyphs take
/// above the topmost nodes.
fn overlay_bounds(diagram: &Diagram, style: &GlyphStyle) -> Bounds {
    let Some(bounds) = diagram.bounds() else {
        return Bounds::default();
    };
    let headroom = style.size() + GLYPH_GAP;
    bounds.merge(&bounds.translate(Point::new(0.0, -headroom)))
}
